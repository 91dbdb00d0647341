use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use super::aggregate::{max_tenure, players_with_tenure};
use super::model::{PlayerSalaryRecord, SalaryTable};

// ---------------------------------------------------------------------------
// Tenure selector
// ---------------------------------------------------------------------------

/// Longest tenure the selector assumes. Offsets are measured from here.
pub const TENURE_UPPER_BOUND: u32 = 16;

/// Tenure values offered by the selector.
pub const TENURE_BUCKETS: RangeInclusive<u32> = 10..=TENURE_UPPER_BOUND;

/// `TENURE_UPPER_BOUND - years`. Applied to the observed maximum tenure,
/// so the selector only means "years served" when that maximum is 16.
pub fn tenure_bucket_to_offset(years_in_league: u32) -> i64 {
    i64::from(TENURE_UPPER_BOUND) - i64::from(years_in_league)
}

/// Players picked by a tenure selector value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenureSelection {
    /// Tenure actually looked up: `max_tenure - offset`.
    pub years_under_evaluation: i64,
    pub players: Vec<String>,
}

/// Resolve a selector value against the table's maximum tenure.
pub fn players_for_tenure_bucket(table: &SalaryTable, years_in_league: u32) -> TenureSelection {
    let max = max_tenure(table).unwrap_or(0) as i64;
    let years_under_evaluation = max - tenure_bucket_to_offset(years_in_league);
    let players = usize::try_from(years_under_evaluation)
        .map(|tenure| players_with_tenure(table, tenure))
        .unwrap_or_default();
    TenureSelection {
        years_under_evaluation,
        players,
    }
}

// ---------------------------------------------------------------------------
// Row lookups
// ---------------------------------------------------------------------------

/// Rows of a top-N view for one season. Empty when the season is absent.
pub fn records_for_year<'a>(
    top_n_table: &[&'a PlayerSalaryRecord],
    year: u16,
) -> Vec<&'a PlayerSalaryRecord> {
    top_n_table.iter().copied().filter(|r| r.year == year).collect()
}

/// Rows whose `Last Name` equals `surname` exactly (case-sensitive),
/// sorted by first name then year.
pub fn records_by_last_name<'a>(table: &'a SalaryTable, surname: &str) -> Vec<&'a PlayerSalaryRecord> {
    let mut rows: Vec<_> = table.records.iter().filter(|r| r.last_name == surname).collect();
    rows.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.year.cmp(&b.year)));
    rows
}

/// Rows whose `Team` equals `team_name` exactly (case-sensitive), sorted by
/// team then year.
pub fn records_by_team<'a>(table: &'a SalaryTable, team_name: &str) -> Vec<&'a PlayerSalaryRecord> {
    let mut rows: Vec<_> = table.records.iter().filter(|r| r.team == team_name).collect();
    rows.sort_by(|a, b| a.team.cmp(&b.team).then(a.year.cmp(&b.year)));
    rows
}

/// Teams with at least one row in `year`.
pub fn distinct_teams_for_year(table: &SalaryTable, year: u16) -> BTreeSet<String> {
    table
        .records
        .iter()
        .filter(|r| r.year == year)
        .map(|r| r.team.clone())
        .collect()
}

/// Seasons present, latest first.
pub fn years_descending(table: &SalaryTable) -> Vec<u16> {
    table.years.iter().rev().copied().collect()
}

// ---------------------------------------------------------------------------
// Selection – a lookup result that may be empty
// ---------------------------------------------------------------------------

/// Outcome of a lookup. An empty match is a normal value, shown as "no data".
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<T> {
    Rows(Vec<T>),
    NoData,
}

impl<T> Selection<T> {
    pub fn rows(&self) -> &[T] {
        match self {
            Selection::Rows(rows) => rows,
            Selection::NoData => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::NoData)
    }
}

impl<T> From<Vec<T>> for Selection<T> {
    fn from(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Selection::NoData
        } else {
            Selection::Rows(rows)
        }
    }
}

impl<T> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Rows(rows) => write!(f, "{} rows", rows.len()),
            Selection::NoData => f.write_str("no data"),
        }
    }
}
