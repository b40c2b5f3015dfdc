//! Bracket tree: rounds, series and the navigation between them.

use crate::models::error::{BracketError, Result};
use crate::models::leg::{Leg, LegId, Slot};
use crate::models::team::TeamId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a bracket.
pub type BracketId = Uuid;

/// Name of a round, derived from how many series it holds.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum RoundKey {
    #[serde(rename = "R32")]
    RoundOf32,
    #[serde(rename = "R16")]
    RoundOf16,
    #[serde(rename = "QF")]
    QuarterFinal,
    #[serde(rename = "SF")]
    SemiFinal,
    #[serde(rename = "F")]
    Final,
}

impl RoundKey {
    /// Key of a round with `count` series, if such a round exists.
    pub fn for_series_count(count: usize) -> Option<Self> {
        match count {
            16 => Some(RoundKey::RoundOf32),
            8 => Some(RoundKey::RoundOf16),
            4 => Some(RoundKey::QuarterFinal),
            2 => Some(RoundKey::SemiFinal),
            1 => Some(RoundKey::Final),
            _ => None,
        }
    }

    pub fn series_count(self) -> usize {
        match self {
            RoundKey::RoundOf32 => 16,
            RoundKey::RoundOf16 => 8,
            RoundKey::QuarterFinal => 4,
            RoundKey::SemiFinal => 2,
            RoundKey::Final => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundKey::RoundOf32 => "R32",
            RoundKey::RoundOf16 => "R16",
            RoundKey::QuarterFinal => "QF",
            RoundKey::SemiFinal => "SF",
            RoundKey::Final => "F",
        }
    }
}

impl fmt::Display for RoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a closed series was decided.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecidedBy {
    Aggregate,
    AwayGoals,
    Penalties,
}

/// Penalty shootout score, home/away relative to the series' first leg.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Penalties {
    pub home: u32,
    pub away: u32,
}

/// Record of how a closed series was decided. Set and cleared together with the winner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeriesOutcome {
    pub decided_by: DecidedBy,
    pub aggregate_home: u32,
    pub aggregate_away: u32,
    /// Only present when the shootout decided the series.
    pub penalties: Option<Penalties>,
}

/// Lifecycle of a series.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesState {
    /// Some required leg is missing a score.
    Open,
    /// All legs scored, no winner recorded yet.
    AwaitingDecision,
    /// Winner recorded.
    Closed,
}

/// A matchup between two sides, played over one or two legs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// 1-based position within its round.
    pub match_no: u32,
    pub legs: Vec<Leg>,
    pub winner_id: Option<TeamId>,
    pub outcome: Option<SeriesOutcome>,
}

impl Series {
    pub(crate) fn new(match_no: u32, legs: Vec<Leg>) -> Self {
        Self {
            match_no,
            legs,
            winner_id: None,
            outcome: None,
        }
    }

    /// Team on `slot` of the series, as given by the first leg.
    pub fn side(&self, slot: Slot) -> Option<TeamId> {
        self.legs.first().and_then(|leg| leg.team(slot))
    }

    pub fn home_id(&self) -> Option<TeamId> {
        self.side(Slot::Home)
    }

    pub fn away_id(&self) -> Option<TeamId> {
        self.side(Slot::Away)
    }

    pub fn has_teams(&self) -> bool {
        self.home_id().is_some() && self.away_id().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.winner_id.is_some()
    }

    pub fn state(&self) -> SeriesState {
        if self.is_closed() {
            SeriesState::Closed
        } else if !self.legs.is_empty() && self.legs.iter().all(Leg::is_scored) {
            SeriesState::AwaitingDecision
        } else {
            SeriesState::Open
        }
    }

    /// Leg by number (1 or 2).
    pub fn leg(&self, leg_number: u8) -> Option<&Leg> {
        self.legs.iter().find(|leg| leg.leg_number == leg_number)
    }

    /// Bind `slot` to `team`. The second leg swaps home and away.
    pub(crate) fn set_side(&mut self, slot: Slot, team: Option<TeamId>) {
        for leg in &mut self.legs {
            if leg.leg_number == 1 {
                leg.set_team(slot, team);
            } else {
                leg.set_team(slot.opposite(), team);
            }
        }
    }

    pub(crate) fn clear_decision(&mut self) {
        self.winner_id = None;
        self.outcome = None;
    }
}

/// A round of the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub key: RoundKey,
    /// Series in this round are played over two legs.
    pub ida_vuelta: bool,
    pub series: Vec<Series>,
}

/// Index of a series inside [`Bracket::rounds`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct SeriesPos {
    pub round: usize,
    pub series: usize,
}

/// Single-elimination bracket: the aggregate root for seeding, results and propagation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub ida_vuelta: bool,
    /// Level aggregates are broken by counting goals scored as visitors double.
    pub away_goals_rule: bool,
    pub single_leg_final: bool,
    pub start_date: Option<NaiveDate>,
    /// First round first, final last.
    pub rounds: Vec<Round>,
    /// Incremented on every successful mutation.
    pub version: u64,
}

impl Bracket {
    /// Number of first-round slots.
    pub fn size(&self) -> usize {
        self.rounds.first().map_or(0, |r| r.series.len() * 2)
    }

    pub fn round(&self, key: RoundKey) -> Option<&Round> {
        self.rounds.iter().find(|r| r.key == key)
    }

    pub fn final_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn series(&self, key: RoundKey, match_no: u32) -> Result<&Series> {
        let pos = self.locate(key, match_no)?;
        Ok(self.series_at(pos))
    }

    pub fn leg(&self, leg_id: LegId) -> Option<&Leg> {
        self.rounds
            .iter()
            .flat_map(|r| r.series.iter())
            .flat_map(|s| s.legs.iter())
            .find(|leg| leg.id == leg_id)
    }

    /// Where the winner of `(key, match_no)` goes: next round, series number and slot.
    /// `None` for the final.
    pub fn next_slot(&self, key: RoundKey, match_no: u32) -> Result<Option<(RoundKey, u32, Slot)>> {
        let pos = self.locate(key, match_no)?;
        Ok(self.next_pos(pos).map(|(next, slot)| {
            let round = &self.rounds[next.round];
            (round.key, round.series[next.series].match_no, slot)
        }))
    }

    /// Winner of the final, once decided.
    pub fn champion(&self) -> Option<TeamId> {
        self.final_round()
            .and_then(|r| r.series.first())
            .and_then(|s| s.winner_id)
    }

    /// Whether `team` already sits in a first-round slot.
    pub fn contains_team(&self, team: TeamId) -> bool {
        self.rounds.first().map_or(false, |r| {
            r.series
                .iter()
                .any(|s| s.home_id() == Some(team) || s.away_id() == Some(team))
        })
    }

    /// Fails with [`BracketError::VersionConflict`] if `expected` is given and stale.
    pub fn check_version(&self, expected: Option<u64>) -> Result<()> {
        match expected {
            Some(expected) if expected != self.version => Err(BracketError::VersionConflict {
                expected,
                found: self.version,
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    pub(crate) fn locate(&self, key: RoundKey, match_no: u32) -> Result<SeriesPos> {
        let not_found = BracketError::SeriesNotFound {
            round: key,
            match_no,
        };
        let round = self
            .rounds
            .iter()
            .position(|r| r.key == key)
            .ok_or_else(|| not_found.clone())?;
        let series = self.rounds[round]
            .series
            .iter()
            .position(|s| s.match_no == match_no)
            .ok_or(not_found)?;
        Ok(SeriesPos { round, series })
    }

    pub(crate) fn locate_leg(&self, leg_id: LegId) -> Result<(SeriesPos, usize)> {
        for (round, r) in self.rounds.iter().enumerate() {
            for (series, s) in r.series.iter().enumerate() {
                if let Some(leg) = s.legs.iter().position(|l| l.id == leg_id) {
                    return Ok((SeriesPos { round, series }, leg));
                }
            }
        }
        Err(BracketError::LegNotFound(leg_id))
    }

    pub(crate) fn series_at(&self, pos: SeriesPos) -> &Series {
        &self.rounds[pos.round].series[pos.series]
    }

    pub(crate) fn series_at_mut(&mut self, pos: SeriesPos) -> &mut Series {
        &mut self.rounds[pos.round].series[pos.series]
    }

    /// Series `k` (0-indexed) of round `r` feeds series `k / 2` of round `r + 1`.
    pub(crate) fn next_pos(&self, pos: SeriesPos) -> Option<(SeriesPos, Slot)> {
        let next_round = pos.round + 1;
        if next_round >= self.rounds.len() {
            return None;
        }
        let match_no = self.series_at(pos).match_no;
        let next = SeriesPos {
            round: next_round,
            series: pos.series / 2,
        };
        Some((next, Slot::for_match_no(match_no)))
    }
}
