//! Bracket construction from a seeding.

use crate::logic::seeding::{Seeding, SUPPORTED_SIZES};
use crate::models::{Bracket, BracketError, Leg, Result, Round, RoundKey, Series, TeamId};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days between consecutive legs in the default schedule.
const DAYS_BETWEEN_LEGS: i64 = 7;

/// Rules fixed when the bracket is created.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketOptions {
    /// Two legs per series (home and away).
    #[serde(default)]
    pub ida_vuelta: bool,
    /// Break level aggregates by doubling goals scored as visitors.
    #[serde(default)]
    pub away_goals_rule: bool,
    /// With `ida_vuelta`, play the final as a single match.
    #[serde(default)]
    pub single_leg_final: bool,
    /// If set, every leg gets a default date, one week apart in play order.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Build the full tree: every round, series and leg. First-round series `k` pairs
/// slot `2k` (home) with slot `2k + 1` (away); later rounds start without teams.
pub fn build_bracket(seeding: &Seeding, options: &BracketOptions) -> Result<Bracket> {
    let size = seeding.size();
    if !SUPPORTED_SIZES.contains(&size) {
        return Err(BracketError::UnsupportedBracketSize { size });
    }

    let mut rounds = Vec::new();
    let mut count = size / 2;
    while count >= 1 {
        // Every supported size halves down through known round names.
        let key = RoundKey::for_series_count(count)
            .ok_or(BracketError::UnsupportedBracketSize { size })?;
        let two_legs = options.ida_vuelta && !(key == RoundKey::Final && options.single_leg_final);
        let first_round = rounds.is_empty();

        let series = (0..count)
            .map(|k| {
                let (home, away) = if first_round {
                    (seeding.slots()[2 * k], seeding.slots()[2 * k + 1])
                } else {
                    (None, None)
                };
                Series::new(k as u32 + 1, new_legs(home, away, two_legs))
            })
            .collect();

        rounds.push(Round {
            key,
            ida_vuelta: two_legs,
            series,
        });
        count /= 2;
    }

    let mut bracket = Bracket {
        id: Uuid::new_v4(),
        ida_vuelta: options.ida_vuelta,
        away_goals_rule: options.away_goals_rule,
        single_leg_final: options.single_leg_final,
        start_date: options.start_date,
        rounds,
        version: 0,
    };
    if let Some(start) = options.start_date {
        assign_default_dates(&mut bracket, start);
    }

    log::debug!(
        "Created bracket {} with {} slots, {} rounds ({} byes)",
        bracket.id,
        size,
        bracket.rounds.len(),
        seeding.byes()
    );
    Ok(bracket)
}

fn new_legs(home: Option<TeamId>, away: Option<TeamId>, two_legs: bool) -> Vec<Leg> {
    let mut legs = vec![Leg::new(1, home, away)];
    if two_legs {
        legs.push(Leg::new(2, away, home));
    }
    legs
}

/// All series of a round share a date per leg; legs are a week apart in play order.
fn assign_default_dates(bracket: &mut Bracket, start: NaiveDate) {
    let mut legs_before = 0;
    for round in &mut bracket.rounds {
        let legs_per_series = if round.ida_vuelta { 2 } else { 1 };
        for series in &mut round.series {
            for leg in &mut series.legs {
                let offset = legs_before + i64::from(leg.leg_number) - 1;
                leg.date = Some(start + Duration::days(offset * DAYS_BETWEEN_LEGS));
            }
        }
        legs_before += legs_per_series;
    }
}
