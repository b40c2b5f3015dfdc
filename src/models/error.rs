//! Errors returned by bracket operations.

use crate::models::bracket::RoundKey;
use crate::models::leg::{LegId, Slot};
use crate::models::team::TeamId;
use std::result;
use thiserror::Error;

/// A `Result<T>` using [`BracketError`] as the error type.
pub type Result<T> = result::Result<T, BracketError>;

/// Errors that can occur during bracket operations.
///
/// Every failing operation leaves the bracket exactly as it was.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("unsupported bracket size {size}: brackets have 2, 4, 8, 16 or 32 slots")]
    UnsupportedBracketSize { size: usize },
    #[error("at least 2 teams are required, found {found}")]
    InsufficientTeams { found: usize },
    #[error("team {0} appears more than once in the bracket")]
    DuplicateTeam(TeamId),
    #[error("slot {slot} is out of range for a bracket of {size} slots")]
    InvalidSlot { slot: usize, size: usize },
    #[error("series {round} #{match_no} has legs without a final score")]
    IncompleteLegs { round: RoundKey, match_no: u32 },
    #[error("series {round} #{match_no} does not have both teams yet")]
    UnresolvedSlots { round: RoundKey, match_no: u32 },
    #[error("the {slot} slot is already taken")]
    SlotNotEmpty { slot: Slot },
    #[error("series {round} #{match_no} is already closed")]
    SeriesAlreadyClosed { round: RoundKey, match_no: u32 },
    #[error("leg {0} is not the first leg of a first-round series")]
    NotAFirstRoundLeg(LegId),
    #[error("legs of a series must be played between the same two teams: {0}")]
    InvalidSeriesLegs(&'static str),
    #[error("penalty shootout cannot end level ({home}-{away})")]
    InvalidPenalties { home: u32, away: u32 },
    #[error("aggregate of {goals} goals is out of range")]
    AggregateOutOfRange { goals: u64 },
    #[error("series is level on aggregate ({aggregate_home}-{aggregate_away}): penalty scores required")]
    PenaltiesRequired {
        aggregate_home: u32,
        aggregate_away: u32,
    },
    #[error("series {round} #{match_no} has no decision to undo")]
    NothingToUndo { round: RoundKey, match_no: u32 },
    #[error("bracket was modified concurrently: expected version {expected}, found {found}")]
    VersionConflict { expected: u64, found: u64 },
    #[error("series {round} #{match_no} not found")]
    SeriesNotFound { round: RoundKey, match_no: u32 },
    #[error("match {0} not found")]
    LegNotFound(LegId),
    #[error("team {0} not found")]
    TeamNotFound(TeamId),
    #[error("a team with this name already exists")]
    DuplicateTeamName,
    #[error("team name must not be empty")]
    InvalidTeamName,
    #[error("the tournament has no bracket yet")]
    NoBracket,
    #[error("the tournament already has a bracket")]
    BracketAlreadyExists,
    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid time {0:?}: expected HH:MM")]
    InvalidTime(String),
    #[error("venue must not be blank")]
    InvalidVenue,
    #[error("invalid standings: {0}")]
    InvalidStandings(String),
}

/// Broad classes of [`BracketError`], deciding how a caller should react.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Input the user can correct. Never retried automatically.
    Validation,
    /// More input is needed (penalty scores); resubmit with it.
    NeedsInput,
    /// Stale version. Safe to retry after reloading.
    Conflict,
    /// The caller asked for something that makes no sense in the current state.
    Misuse,
    NotFound,
}

impl BracketError {
    pub fn kind(&self) -> ErrorKind {
        use BracketError::*;
        match self {
            PenaltiesRequired { .. } => ErrorKind::NeedsInput,
            VersionConflict { .. } => ErrorKind::Conflict,
            NothingToUndo { .. } => ErrorKind::Misuse,
            SeriesNotFound { .. } | LegNotFound(_) | TeamNotFound(_) | NoBracket => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::Validation,
        }
    }
}
