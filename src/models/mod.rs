//! Data structures for the cup bracket: teams, legs, series, rounds, tournament.

mod bracket;
mod error;
mod leg;
mod team;
mod tournament;

pub use bracket::{
    Bracket, BracketId, DecidedBy, Penalties, Round, RoundKey, Series, SeriesOutcome, SeriesState,
};
pub(crate) use bracket::SeriesPos;
pub use error::{BracketError, ErrorKind, Result};
pub use leg::{Leg, LegId, Slot};
pub use team::{StandingRow, Team, TeamId};
pub use tournament::{Tournament, TournamentId};
