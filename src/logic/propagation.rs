//! Closing and reopening series, and writing winners through to the next round.
//!
//! Every operation validates fully before its first write, so a failing call leaves the
//! bracket untouched and a successful one bumps [`Bracket::version`] exactly once.

use crate::logic::resolver::{self, ScoredLeg, SeriesDecision};
use crate::models::{
    Bracket, BracketError, DecidedBy, LegId, Penalties, Result, RoundKey, SeriesOutcome, SeriesPos,
    Slot, TeamId,
};
use std::collections::HashSet;

/// Decide series `(round, match_no)` and advance its winner.
///
/// Fails with [`BracketError::PenaltiesRequired`] when the tie is level after the
/// aggregate (and away-goals) comparison and no `penalties` were given; resubmit with them.
pub fn close_series(
    bracket: &mut Bracket,
    round: RoundKey,
    match_no: u32,
    penalties: Option<Penalties>,
) -> Result<TeamId> {
    let pos = bracket.locate(round, match_no)?;
    let series = bracket.series_at(pos);
    if series.is_closed() {
        return Err(BracketError::SeriesAlreadyClosed { round, match_no });
    }
    if !series.has_teams() {
        return Err(BracketError::UnresolvedSlots { round, match_no });
    }
    let legs = series
        .legs
        .iter()
        .map(ScoredLeg::from_leg)
        .collect::<Option<Vec<_>>>()
        .ok_or(BracketError::IncompleteLegs { round, match_no })?;

    let (winner_id, decided_by, aggregate_home, aggregate_away) =
        match resolver::decide(&legs, bracket.away_goals_rule, penalties)? {
            SeriesDecision::Decided {
                winner_id,
                decided_by,
                aggregate_home,
                aggregate_away,
            } => (winner_id, decided_by, aggregate_home, aggregate_away),
            SeriesDecision::PenaltiesRequired {
                aggregate_home,
                aggregate_away,
            } => {
                return Err(BracketError::PenaltiesRequired {
                    aggregate_home,
                    aggregate_away,
                })
            }
        };

    let next = bracket.next_pos(pos);
    if let Some((next_pos, _)) = next {
        let downstream = bracket.series_at(next_pos);
        if downstream.is_closed() {
            return Err(BracketError::SeriesAlreadyClosed {
                round: bracket.rounds[next_pos.round].key,
                match_no: downstream.match_no,
            });
        }
    }

    let series = bracket.series_at_mut(pos);
    series.winner_id = Some(winner_id);
    series.outcome = Some(SeriesOutcome {
        decided_by,
        aggregate_home,
        aggregate_away,
        penalties: penalties.filter(|_| decided_by == DecidedBy::Penalties),
    });
    if let Some((next_pos, slot)) = next {
        let downstream = bracket.series_at_mut(next_pos);
        if let Some(stale) = downstream.side(slot).filter(|&t| t != winner_id) {
            log::debug!("Overwriting stale team {} in {} slot", stale, slot);
        }
        downstream.set_side(slot, Some(winner_id));
    }
    bracket.bump_version();

    log::info!(
        "Closed series {} #{}: winner {} by {:?} ({}-{})",
        round,
        match_no,
        winner_id,
        decided_by,
        aggregate_home,
        aggregate_away
    );
    Ok(winner_id)
}

/// Reopen series `(round, match_no)`: clear its winner and everything that followed from it.
///
/// A closed downstream series that received the winner is reopened first, all the way to
/// the final. Leg scores are kept. Returns the reopened series, downstream-most first.
pub fn undo_series(
    bracket: &mut Bracket,
    round: RoundKey,
    match_no: u32,
) -> Result<Vec<(RoundKey, u32)>> {
    let start = bracket.locate(round, match_no)?;
    if !bracket.series_at(start).is_closed() {
        return Err(BracketError::NothingToUndo { round, match_no });
    }

    // Walk downstream while the winner we placed sits in a closed series.
    let mut chain = vec![start];
    let mut visited = HashSet::from([start]);
    let mut current = start;
    while let Some((next, slot)) = bracket.next_pos(current) {
        let placed = bracket.series_at(current).winner_id;
        let downstream = bracket.series_at(next);
        if !downstream.is_closed() || downstream.side(slot) != placed || !visited.insert(next) {
            break;
        }
        chain.push(next);
        current = next;
    }

    let mut undone = Vec::with_capacity(chain.len());
    for &pos in chain.iter().rev() {
        clear_series(bracket, pos);
        let key = bracket.rounds[pos.round].key;
        let no = bracket.series_at(pos).match_no;
        log::info!("Reopened series {} #{}", key, no);
        undone.push((key, no));
    }
    bracket.bump_version();
    Ok(undone)
}

/// Clear the decision of `pos` and, if it still holds that winner, the slot it filled downstream.
fn clear_series(bracket: &mut Bracket, pos: SeriesPos) {
    let series = bracket.series_at_mut(pos);
    let winner = series.winner_id;
    series.clear_decision();
    if let Some((next, slot)) = bracket.next_pos(pos) {
        let downstream = bracket.series_at_mut(next);
        if winner.is_some() && downstream.side(slot) == winner {
            downstream.set_side(slot, None);
        }
    }
}

/// Put `team_id` into an empty first-round slot, typically a bye filled by a late entry.
///
/// `leg_id` must be the first leg of a first-round series that is still open.
pub fn assign_slot(bracket: &mut Bracket, leg_id: LegId, slot: Slot, team_id: TeamId) -> Result<()> {
    let (pos, leg_idx) = bracket.locate_leg(leg_id)?;
    let series = bracket.series_at(pos);
    let leg = &series.legs[leg_idx];
    if pos.round != 0 || leg.leg_number != 1 {
        return Err(BracketError::NotAFirstRoundLeg(leg_id));
    }
    if series.is_closed() {
        return Err(BracketError::SeriesAlreadyClosed {
            round: bracket.rounds[pos.round].key,
            match_no: series.match_no,
        });
    }
    if leg.team(slot).is_some() {
        return Err(BracketError::SlotNotEmpty { slot });
    }
    if bracket.contains_team(team_id) {
        return Err(BracketError::DuplicateTeam(team_id));
    }

    bracket.series_at_mut(pos).set_side(slot, Some(team_id));
    bracket.bump_version();
    log::info!("Assigned team {} to {} slot of leg {}", team_id, slot, leg_id);
    Ok(())
}
