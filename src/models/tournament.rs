//! Tournament: team registry plus the (optional) bracket.

use crate::models::bracket::Bracket;
use crate::models::error::{BracketError, Result};
use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A cup tournament. Teams are registered first; the bracket is created once and lives
/// until the tournament is deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub teams: Vec<Team>,
    /// None until the bracket has been initialised.
    pub bracket: Option<Bracket>,
}

impl Tournament {
    /// Create a new tournament with no teams and no bracket.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            teams: Vec::new(),
            bracket: None,
        }
    }

    /// Create a tournament with initial teams.
    pub fn with_teams(name: impl Into<String>, teams: Vec<Team>) -> Self {
        Self {
            teams,
            ..Self::new(name)
        }
    }

    pub fn find_team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Fails with [`BracketError::TeamNotFound`] unless `id` is registered.
    pub fn require_team(&self, id: TeamId) -> Result<&Team> {
        self.find_team(id).ok_or(BracketError::TeamNotFound(id))
    }

    /// Register a team. Names are trimmed and must be unique (case-insensitive).
    ///
    /// Allowed after the bracket exists too: new teams can fill byes.
    pub fn add_team(&mut self, name: impl Into<String>) -> Result<TeamId> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(BracketError::InvalidTeamName);
        }
        let is_duplicate = self
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(BracketError::DuplicateTeamName);
        }
        let team = Team::new(name_trimmed);
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    /// Remove a team by id (only before the bracket exists).
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<()> {
        if self.bracket.is_some() {
            return Err(BracketError::BracketAlreadyExists);
        }
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(BracketError::TeamNotFound(team_id))?;
        self.teams.remove(idx);
        Ok(())
    }

    pub fn bracket(&self) -> Result<&Bracket> {
        self.bracket.as_ref().ok_or(BracketError::NoBracket)
    }

    pub fn bracket_mut(&mut self) -> Result<&mut Bracket> {
        self.bracket.as_mut().ok_or(BracketError::NoBracket)
    }
}
