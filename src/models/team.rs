//! Team and standings row data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team. The bracket stores these, never the team itself.
pub type TeamId = Uuid;

/// A team registered in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    /// Create a new team with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// One row of a league table as handed over by a standings provider.
///
/// Rank is the row's position in the list; `points` and the rest are carried for display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team_id: TeamId,
    pub points: u32,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub goal_difference: i32,
}

impl StandingRow {
    pub fn new(team_id: TeamId, points: u32) -> Self {
        Self {
            team_id,
            points,
            played: 0,
            goal_difference: 0,
        }
    }
}
