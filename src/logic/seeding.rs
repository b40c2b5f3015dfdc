//! Seeding: place teams into first-round slots (by standings, random draw, or by hand).

use crate::models::{BracketError, Result, StandingRow, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Bracket sizes (first-round slots) the engine supports.
pub const SUPPORTED_SIZES: [usize; 5] = [2, 4, 8, 16, 32];

/// Initial slot layout. `None` is a bye.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Seeding {
    slots: Vec<Option<TeamId>>,
}

impl Seeding {
    pub fn slots(&self) -> &[Option<TeamId>] {
        &self.slots
    }

    /// Number of slots (always a supported power of two).
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Seeded teams, in slot order.
    pub fn teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn team_count(&self) -> usize {
        self.teams().count()
    }

    pub fn byes(&self) -> usize {
        self.size() - self.team_count()
    }
}

/// Slots needed for `team_count` teams.
pub fn bracket_size(team_count: usize) -> Result<usize> {
    if team_count < 2 {
        return Err(BracketError::InsufficientTeams { found: team_count });
    }
    let size = team_count.next_power_of_two();
    if !SUPPORTED_SIZES.contains(&size) {
        return Err(BracketError::UnsupportedBracketSize { size });
    }
    Ok(size)
}

/// Place `teams` into the first slots, pad the rest with byes.
fn place_in_order(teams: Vec<TeamId>) -> Result<Seeding> {
    let size = bracket_size(teams.len())?;
    check_distinct(teams.iter().copied())?;
    let mut slots: Vec<Option<TeamId>> = teams.into_iter().map(Some).collect();
    slots.resize(size, None);
    Ok(Seeding { slots })
}

fn check_distinct(teams: impl Iterator<Item = TeamId>) -> Result<()> {
    let mut seen = HashSet::new();
    for team in teams {
        if !seen.insert(team) {
            return Err(BracketError::DuplicateTeam(team));
        }
    }
    Ok(())
}

/// Seed the top `clasificados` teams of a league table; rank `i` goes to slot `i`.
pub fn build_from_standings(standings: &[StandingRow], clasificados: usize) -> Result<Seeding> {
    let take = clasificados.min(standings.len());
    let teams = standings[..take].iter().map(|row| row.team_id).collect();
    let seeding = place_in_order(teams)?;
    log::debug!(
        "Seeded {} of {} ranked teams into {} slots",
        take,
        standings.len(),
        seeding.size()
    );
    Ok(seeding)
}

/// Seed teams in a uniformly random order.
pub fn build_random(team_ids: &[TeamId]) -> Result<Seeding> {
    build_random_with(team_ids, &mut rand::thread_rng())
}

/// [`build_random`] with a caller-supplied RNG.
pub fn build_random_with<R: Rng + ?Sized>(team_ids: &[TeamId], rng: &mut R) -> Result<Seeding> {
    let mut teams = team_ids.to_vec();
    teams.shuffle(rng);
    place_in_order(teams)
}

/// Seed from an explicit `slot -> team` placement. Unassigned (or `None`) slots are byes.
///
/// The bracket is sized for the number of placed teams, so every slot index must fit it.
pub fn build_manual(assignment: &BTreeMap<usize, Option<TeamId>>) -> Result<Seeding> {
    let placed: Vec<(usize, TeamId)> = assignment
        .iter()
        .filter_map(|(&slot, team)| team.map(|t| (slot, t)))
        .collect();
    let size = bracket_size(placed.len())?;
    check_distinct(placed.iter().map(|&(_, t)| t))?;

    let mut slots = vec![None; size];
    for (slot, team) in placed {
        let cell = slots
            .get_mut(slot)
            .ok_or(BracketError::InvalidSlot { slot, size })?;
        *cell = Some(team);
    }
    Ok(Seeding { slots })
}
