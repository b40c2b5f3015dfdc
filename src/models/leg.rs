//! Leg (one scheduled match of a series) and the home/away Slot.

use crate::models::team::TeamId;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a leg.
pub type LegId = Uuid;

/// Side of a series (or leg).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Home,
    Away,
}

impl Slot {
    /// Slot of the next round's series that the winner of series `match_no` feeds:
    /// odd numbers go home, even numbers go away.
    pub fn for_match_no(match_no: u32) -> Self {
        if match_no % 2 == 1 {
            Slot::Home
        } else {
            Slot::Away
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Slot::Home => Slot::Away,
            Slot::Away => Slot::Home,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Home => write!(f, "home"),
            Slot::Away => write!(f, "away"),
        }
    }
}

/// A single match within a series.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub id: LegId,
    /// 1 or 2.
    pub leg_number: u8,
    /// None until seeded or filled by propagation.
    pub home_id: Option<TeamId>,
    pub away_id: Option<TeamId>,
    /// None until entered.
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub venue: Option<String>,
}

impl Leg {
    pub fn new(leg_number: u8, home_id: Option<TeamId>, away_id: Option<TeamId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            leg_number,
            home_id,
            away_id,
            home_goals: None,
            away_goals: None,
            date: None,
            time: None,
            venue: None,
        }
    }

    /// Team bound to `slot` in this leg.
    pub fn team(&self, slot: Slot) -> Option<TeamId> {
        match slot {
            Slot::Home => self.home_id,
            Slot::Away => self.away_id,
        }
    }

    pub(crate) fn set_team(&mut self, slot: Slot, team: Option<TeamId>) {
        match slot {
            Slot::Home => self.home_id = team,
            Slot::Away => self.away_id = team,
        }
    }

    /// Both sides are bound to a team.
    pub fn has_teams(&self) -> bool {
        self.home_id.is_some() && self.away_id.is_some()
    }

    /// Both scores have been entered.
    pub fn is_scored(&self) -> bool {
        self.home_goals.is_some() && self.away_goals.is_some()
    }
}
