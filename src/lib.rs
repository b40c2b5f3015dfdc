//! Cup bracket engine: single-elimination brackets with one- or two-legged series,
//! tie-breaks, winner propagation and cascading undo.

pub mod config;
pub mod logic;
pub mod models;

pub use logic::{
    assign_slot, build_bracket, build_from_standings, build_manual, build_random,
    build_random_with, close_series, decide, init_bracket, set_schedule, set_score, undo_series,
    update_leg, BracketOptions, CsvStandings, LegUpdate, ScheduleUpdate, ScoredLeg, SeedSource,
    Seeding, SeriesDecision, StandingsProvider,
};
pub use models::{
    Bracket, BracketError, BracketId, DecidedBy, ErrorKind, Leg, LegId, Penalties, Result, Round,
    RoundKey, Series, SeriesOutcome, SeriesState, Slot, StandingRow, Team, TeamId, Tournament,
    TournamentId,
};
