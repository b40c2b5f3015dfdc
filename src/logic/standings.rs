//! Standings providers: where a table-seeded bracket gets its ranked teams from.

use crate::models::{BracketError, Result, StandingRow};
use std::io;

/// Source of a ranked league table, best team first.
///
/// Passed explicitly into seeding so any caching lives with the caller.
pub trait StandingsProvider {
    fn standings(&self) -> Result<Vec<StandingRow>>;
}

impl StandingsProvider for [StandingRow] {
    fn standings(&self) -> Result<Vec<StandingRow>> {
        Ok(self.to_vec())
    }
}

impl StandingsProvider for Vec<StandingRow> {
    fn standings(&self) -> Result<Vec<StandingRow>> {
        Ok(self.clone())
    }
}

/// Standings read from CSV with a header row:
///
/// ```text
/// team_id,points,played,goal_difference
/// 7f1c...,21,9,12
/// ```
///
/// `played` and `goal_difference` may be omitted. Row order is rank order.
#[derive(Clone, Debug, Default)]
pub struct CsvStandings {
    rows: Vec<StandingRow>,
}

impl CsvStandings {
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut rows = Vec::new();
        for record in rdr.deserialize() {
            let row: StandingRow =
                record.map_err(|e| BracketError::InvalidStandings(e.to_string()))?;
            rows.push(row);
        }
        log::debug!("Read {} standings rows from CSV", rows.len());
        Ok(Self { rows })
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    pub fn rows(&self) -> &[StandingRow] {
        &self.rows
    }
}

impl StandingsProvider for CsvStandings {
    fn standings(&self) -> Result<Vec<StandingRow>> {
        Ok(self.rows.clone())
    }
}
