//! Series tie-break: aggregate score, then doubled away goals, then penalties.

use crate::models::{BracketError, DecidedBy, Leg, Penalties, Result, TeamId};
use serde::{Deserialize, Serialize};

/// A fully played leg.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoredLeg {
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl ScoredLeg {
    /// None unless both teams and both scores are set.
    pub fn from_leg(leg: &Leg) -> Option<Self> {
        Some(Self {
            home_id: leg.home_id?,
            away_id: leg.away_id?,
            home_goals: leg.home_goals?,
            away_goals: leg.away_goals?,
        })
    }
}

/// Result of resolving a series. Home/away refer to the first leg.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesDecision {
    Decided {
        winner_id: TeamId,
        decided_by: DecidedBy,
        aggregate_home: u32,
        aggregate_away: u32,
    },
    PenaltiesRequired {
        aggregate_home: u32,
        aggregate_away: u32,
    },
}

/// Totals for one team, in `u64` so summed `u32` goals cannot overflow.
#[derive(Default)]
struct Tally {
    goals: u64,
    /// Goals with those scored as visitors counted twice.
    weighted: u64,
}

/// Aggregates are reported as `u32`, like the leg scores they sum.
fn aggregate(goals: u64) -> Result<u32> {
    u32::try_from(goals).map_err(|_| BracketError::AggregateOutOfRange { goals })
}

/// Decide a series from its legs.
///
/// Goals are summed per team, not per position, since sides swap in the second leg.
/// Penalties are only consulted when both aggregates are level.
pub fn decide(
    legs: &[ScoredLeg],
    away_goals_rule: bool,
    penalties: Option<Penalties>,
) -> Result<SeriesDecision> {
    let first = legs
        .first()
        .ok_or(BracketError::InvalidSeriesLegs("no legs"))?;
    let (home_id, away_id) = (first.home_id, first.away_id);
    if home_id == away_id {
        return Err(BracketError::InvalidSeriesLegs("a team cannot face itself"));
    }

    let mut home = Tally::default();
    let mut away = Tally::default();
    for leg in legs {
        let (host, visitor) = if leg.home_id == home_id && leg.away_id == away_id {
            (&mut home, &mut away)
        } else if leg.home_id == away_id && leg.away_id == home_id {
            (&mut away, &mut home)
        } else {
            return Err(BracketError::InvalidSeriesLegs("teams differ between legs"));
        };
        host.goals += u64::from(leg.home_goals);
        host.weighted += u64::from(leg.home_goals);
        visitor.goals += u64::from(leg.away_goals);
        visitor.weighted += 2 * u64::from(leg.away_goals);
    }
    let (aggregate_home, aggregate_away) = (aggregate(home.goals)?, aggregate(away.goals)?);

    let decided = |winner_home: bool, decided_by| SeriesDecision::Decided {
        winner_id: if winner_home { home_id } else { away_id },
        decided_by,
        aggregate_home,
        aggregate_away,
    };

    if home.goals != away.goals {
        return Ok(decided(home.goals > away.goals, DecidedBy::Aggregate));
    }
    if away_goals_rule && home.weighted != away.weighted {
        return Ok(decided(home.weighted > away.weighted, DecidedBy::AwayGoals));
    }
    match penalties {
        None => Ok(SeriesDecision::PenaltiesRequired {
            aggregate_home,
            aggregate_away,
        }),
        Some(p) if p.home == p.away => Err(BracketError::InvalidPenalties {
            home: p.home,
            away: p.away,
        }),
        Some(p) => Ok(decided(p.home > p.away, DecidedBy::Penalties)),
    }
}
