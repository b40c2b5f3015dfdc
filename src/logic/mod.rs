//! Bracket business logic: seeding, construction, tie-breaks, propagation, scheduling.

mod propagation;
mod resolver;
mod schedule;
mod seeding;
mod setup;
mod standings;
mod tree;

pub use propagation::{assign_slot, close_series, undo_series};
pub use resolver::{decide, ScoredLeg, SeriesDecision};
pub use schedule::{
    parse_date, parse_time, set_schedule, set_score, update_leg, LegUpdate, ScheduleUpdate,
};
pub use seeding::{
    bracket_size, build_from_standings, build_manual, build_random, build_random_with, Seeding,
    SUPPORTED_SIZES,
};
pub use setup::{init_bracket, SeedSource};
pub use standings::{CsvStandings, StandingsProvider};
pub use tree::{build_bracket, BracketOptions};
