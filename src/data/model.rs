use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Position – playing position short code
// ---------------------------------------------------------------------------

/// Playing position as it appears in the `Pos` column.
///
/// Hybrid codes are normalised so that `M-D` and `D/M` both become
/// [`Position::DefenderMidfielder`]. Codes outside the known set are kept
/// verbatim in [`Position::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    DefenderMidfielder,
    MidfielderForward,
    Other(String),
}

impl Position {
    pub const KNOWN: [Position; 6] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
        Position::DefenderMidfielder,
        Position::MidfielderForward,
    ];

    /// The canonical short code.
    pub fn code(&self) -> &str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "D",
            Position::Midfielder => "M",
            Position::Forward => "F",
            Position::DefenderMidfielder => "D-M",
            Position::MidfielderForward => "M-F",
            Position::Other(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Position::Other(_))
    }
}

impl FromStr for Position {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase().replace('/', "-");
        Ok(match code.as_str() {
            "GK" => Position::Goalkeeper,
            "D" => Position::Defender,
            "M" => Position::Midfielder,
            "F" => Position::Forward,
            "D-M" | "M-D" => Position::DefenderMidfielder,
            "M-F" | "F-M" => Position::MidfielderForward,
            _ => Position::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for Position {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(pos) => pos,
            Err(never) => match never {},
        }
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.code().to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// PlayerSalaryRecord – one row of the main dataset
// ---------------------------------------------------------------------------

/// Columns every salary source must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Team",
    "Club",
    "Last Name",
    "First Name",
    "Pos",
    "Year",
    "Base Salary",
    "Compensation",
];

/// Optional column carrying a precomputed player key.
pub const UNIQUE_NAME_COLUMN: &str = "uniquename";

/// One player in one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSalaryRecord {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Club")]
    pub club: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Pos")]
    pub position: Position,
    #[serde(rename = "Year", deserialize_with = "deserialize_year")]
    pub year: u16,
    #[serde(rename = "Base Salary")]
    pub base_salary: f64,
    #[serde(rename = "Compensation")]
    pub compensation: f64,
    /// Player key across seasons. Derived when the source leaves it empty.
    #[serde(rename = "uniquename", default)]
    pub unique_name: String,
}

impl PlayerSalaryRecord {
    /// `Last Name` + `_` + `First Name`.
    pub fn derive_unique_name(last_name: &str, first_name: &str) -> String {
        format!("{last_name}_{first_name}")
    }

    /// Fill in `unique_name` if the source did not supply one.
    pub fn ensure_unique_name(&mut self) {
        if self.unique_name.trim().is_empty() {
            self.unique_name = Self::derive_unique_name(&self.last_name, &self.first_name);
        }
    }

    /// Compensation is expected to include the base salary.
    pub fn is_underpaid(&self) -> bool {
        self.compensation < self.base_salary
    }
}

/// Years may come through pandas as `2007.0`; accept any integral number.
fn deserialize_year<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    year_from_f64(value)
        .ok_or_else(|| serde::de::Error::custom(format!("'{value}' is not a valid year")))
}

/// A season number stored as a float; `None` unless integral and positive.
pub(crate) fn year_from_f64(value: f64) -> Option<u16> {
    if value.fract() != 0.0 || value < 1.0 || value > f64::from(u16::MAX) {
        return None;
    }
    Some(value as u16)
}

// ---------------------------------------------------------------------------
// SalaryTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The main dataset with pre-computed column indices. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryTable {
    /// All rows, in source order.
    pub records: Vec<PlayerSalaryRecord>,
    /// Sorted set of seasons present.
    pub years: BTreeSet<u16>,
    /// Sorted set of team names across all seasons.
    pub teams: BTreeSet<String>,
}

impl SalaryTable {
    /// Build column indices from the loaded rows.
    pub fn from_records(mut records: Vec<PlayerSalaryRecord>) -> Self {
        let mut years = BTreeSet::new();
        let mut teams = BTreeSet::new();
        for record in &mut records {
            record.ensure_unique_name();
            years.insert(record.year);
            teams.insert(record.team.clone());
        }
        SalaryTable {
            records,
            years,
            teams,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Position ratio tables (auxiliary, precomputed upstream)
// ---------------------------------------------------------------------------

/// One row of an auxiliary position table.
///
/// For the league-wide table `observed` is the share of players at the
/// position and `expected` is `None`. For the top-N tables both are counts.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRatioRecord {
    pub position: Position,
    pub observed: f64,
    pub expected: Option<f64>,
}

/// Which auxiliary layout a file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioLayout {
    /// `Pos, Pos ratio MLS`
    LeagueShare,
    /// `Pos, Observed_value, Expected_value`
    ObservedExpected,
}

impl RatioLayout {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            RatioLayout::LeagueShare => &["Pos", "Pos ratio MLS"],
            RatioLayout::ObservedExpected => &["Pos", "Observed_value", "Expected_value"],
        }
    }
}

/// Number of top-paid players per season considered by a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TopN {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl TopN {
    pub const ALL: [TopN; 3] = [TopN::Ten, TopN::TwentyFive, TopN::Fifty];

    pub fn size(self) -> usize {
        match self {
            TopN::Ten => 10,
            TopN::TwentyFive => 25,
            TopN::Fifty => 50,
        }
    }
}

impl fmt::Display for TopN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.size())
    }
}

/// Every table the dashboard reads, loaded once.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub salaries: SalaryTable,
    /// League-wide share of players per position.
    pub league_positions: Vec<PositionRatioRecord>,
    /// Observed vs expected positions among the top 10 / 25 / 50.
    pub top_ten_positions: Vec<PositionRatioRecord>,
    pub top_twenty_five_positions: Vec<PositionRatioRecord>,
    pub top_fifty_positions: Vec<PositionRatioRecord>,
}

impl DashboardData {
    pub fn top_positions(&self, top_n: TopN) -> &[PositionRatioRecord] {
        match top_n {
            TopN::Ten => &self.top_ten_positions,
            TopN::TwentyFive => &self.top_twenty_five_positions,
            TopN::Fifty => &self.top_fifty_positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hybrid_position_codes_normalise() {
        assert_eq!("M-D".parse::<Position>().unwrap(), Position::DefenderMidfielder);
        assert_eq!("f/m".parse::<Position>().unwrap(), Position::MidfielderForward);
        assert_eq!(" GK ".parse::<Position>().unwrap(), Position::Goalkeeper);
        assert_eq!(
            "D-F".parse::<Position>().unwrap(),
            Position::Other("D-F".to_string())
        );
    }

    #[test]
    fn unique_name_derived_only_when_missing() {
        let mut record = PlayerSalaryRecord {
            team: "LA Galaxy".into(),
            club: "LA".into(),
            last_name: "Beckham".into(),
            first_name: "David".into(),
            position: Position::Midfielder,
            year: 2008,
            base_salary: 5_500_000.0,
            compensation: 6_500_000.0,
            unique_name: String::new(),
        };
        record.ensure_unique_name();
        assert_eq!(record.unique_name, "Beckham_David");

        record.unique_name = "custom".into();
        record.ensure_unique_name();
        assert_eq!(record.unique_name, "custom");
    }

    #[test]
    fn top_n_sizes_are_distinct() {
        let sizes: Vec<usize> = TopN::ALL.into_iter().map(TopN::size).collect();
        assert_eq!(sizes, vec![10, 25, 50]);
        assert_eq!(TopN::TwentyFive.to_string(), "25");
    }
}
