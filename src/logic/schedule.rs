//! Per-leg updates: schedule (date, time, venue) and score entry.
//!
//! Scheduling never checks for double-booking; court availability belongs to the
//! reservation system.

use crate::models::{Bracket, BracketError, LegId, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Schedule fields to set on a leg. Absent fields are left as they are.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub venue: Option<String>,
}

/// Everything that can change on a leg in one call.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LegUpdate {
    #[serde(flatten)]
    pub schedule: ScheduleUpdate,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}

impl LegUpdate {
    fn touches_score(&self) -> bool {
        self.home_goals.is_some() || self.away_goals.is_some()
    }
}

/// Parse a calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| BracketError::InvalidDate(s.to_string()))
}

/// Parse a time of day (`HH:MM`, seconds optional).
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s_trimmed = s.trim();
    NaiveTime::parse_from_str(s_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s_trimmed, "%H:%M:%S"))
        .map_err(|_| BracketError::InvalidTime(s.to_string()))
}

/// Set date, time and/or venue of a leg.
pub fn set_schedule(bracket: &mut Bracket, leg_id: LegId, schedule: ScheduleUpdate) -> Result<()> {
    update_leg(
        bracket,
        leg_id,
        LegUpdate {
            schedule,
            ..LegUpdate::default()
        },
    )
}

/// Enter (or correct) the score of a leg.
pub fn set_score(
    bracket: &mut Bracket,
    leg_id: LegId,
    home_goals: Option<u32>,
    away_goals: Option<u32>,
) -> Result<()> {
    update_leg(
        bracket,
        leg_id,
        LegUpdate {
            home_goals,
            away_goals,
            ..LegUpdate::default()
        },
    )
}

/// Apply schedule and score changes to a leg, all or nothing.
///
/// Scores can only change while both teams are known and the series is not closed;
/// reopen it with `undo_series` first.
pub fn update_leg(bracket: &mut Bracket, leg_id: LegId, update: LegUpdate) -> Result<()> {
    let (pos, leg_idx) = bracket.locate_leg(leg_id)?;

    let venue = match &update.schedule.venue {
        Some(v) if v.trim().is_empty() => return Err(BracketError::InvalidVenue),
        Some(v) => Some(v.trim().to_string()),
        None => None,
    };
    if update.touches_score() {
        let series = bracket.series_at(pos);
        let round = bracket.rounds[pos.round].key;
        if series.is_closed() {
            return Err(BracketError::SeriesAlreadyClosed {
                round,
                match_no: series.match_no,
            });
        }
        if !series.legs[leg_idx].has_teams() {
            return Err(BracketError::UnresolvedSlots {
                round,
                match_no: series.match_no,
            });
        }
    }

    let leg = &mut bracket.series_at_mut(pos).legs[leg_idx];
    if let Some(date) = update.schedule.date {
        leg.date = Some(date);
    }
    if let Some(time) = update.schedule.time {
        leg.time = Some(time);
    }
    if venue.is_some() {
        leg.venue = venue;
    }
    if let Some(goals) = update.home_goals {
        leg.home_goals = Some(goals);
    }
    if let Some(goals) = update.away_goals {
        leg.away_goals = Some(goals);
    }
    bracket.bump_version();
    log::debug!("Updated leg {}", leg_id);
    Ok(())
}
