//! Setup phase: seed the registered teams and create the bracket (once per tournament).

use crate::logic::seeding::{self, Seeding};
use crate::logic::standings::StandingsProvider;
use crate::logic::tree::{self, BracketOptions};
use crate::models::{BracketError, Result, TeamId, Tournament};
use std::collections::BTreeMap;

/// Where the initial slot layout comes from.
pub enum SeedSource<'a> {
    /// Top `clasificados` teams of a league table, in rank order.
    Table {
        provider: &'a dyn StandingsProvider,
        clasificados: usize,
    },
    /// Random draw of these teams.
    Random(&'a [TeamId]),
    /// Explicit `slot -> team` placement.
    Manual(&'a BTreeMap<usize, Option<TeamId>>),
}

impl SeedSource<'_> {
    pub fn seed(&self) -> Result<Seeding> {
        match self {
            SeedSource::Table {
                provider,
                clasificados,
            } => seeding::build_from_standings(&provider.standings()?, *clasificados),
            SeedSource::Random(team_ids) => seeding::build_random(team_ids),
            SeedSource::Manual(assignment) => seeding::build_manual(assignment),
        }
    }
}

/// Create the tournament's bracket. Every seeded team must be registered.
pub fn init_bracket(
    tournament: &mut Tournament,
    source: SeedSource<'_>,
    options: &BracketOptions,
) -> Result<()> {
    if tournament.bracket.is_some() {
        return Err(BracketError::BracketAlreadyExists);
    }
    let seeding = source.seed()?;
    for team in seeding.teams() {
        tournament.require_team(team)?;
    }
    let bracket = tree::build_bracket(&seeding, options)?;
    log::info!(
        "Tournament {}: bracket of {} slots created ({} teams)",
        tournament.id,
        bracket.size(),
        seeding.team_count()
    );
    tournament.bracket = Some(bracket);
    Ok(())
}
