//! Derived views over an immutable [`SalaryTable`].
//!
//! Every function here is pure: it borrows the table and returns a fresh
//! view, so views can be recomputed on every interaction.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{PlayerSalaryRecord, Position, SalaryTable};

/// Smallest bin count the compensation histogram will ever use.
pub const MIN_HISTOGRAM_BINS: usize = 1;

/// Largest number of bins [`histogram`] will build, whatever it is asked for.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Round to cents, halves to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// ---------------------------------------------------------------------------
// Highest paid
// ---------------------------------------------------------------------------

/// For each season, every record whose compensation equals that season's
/// maximum. Ties are all kept. Ordered by year, then source order.
pub fn max_compensation_per_year(table: &SalaryTable) -> Vec<&PlayerSalaryRecord> {
    let mut max_by_year: BTreeMap<u16, f64> = BTreeMap::new();
    for record in &table.records {
        max_by_year
            .entry(record.year)
            .and_modify(|max| *max = max.max(record.compensation))
            .or_insert(record.compensation);
    }

    let mut rows: Vec<&PlayerSalaryRecord> = table
        .records
        .iter()
        .filter(|r| max_by_year.get(&r.year) == Some(&r.compensation))
        .collect();
    rows.sort_by_key(|r| r.year);
    rows
}

/// For each season, the `n` best paid records.
///
/// Rows are stably sorted by year then compensation, both descending, and
/// each season is truncated to its first `n` rows. A tie straddling the
/// cut keeps only the rows that came first in the source.
pub fn top_n_per_year(table: &SalaryTable, n: usize) -> Vec<&PlayerSalaryRecord> {
    let mut rows: Vec<&PlayerSalaryRecord> = table.records.iter().collect();
    rows.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.compensation.total_cmp(&a.compensation))
    });

    let mut taken: BTreeMap<u16, usize> = BTreeMap::new();
    rows.retain(|r| {
        let count = taken.entry(r.year).or_default();
        *count += 1;
        *count <= n
    });
    rows
}

// ---------------------------------------------------------------------------
// Tenure
// ---------------------------------------------------------------------------

/// Rows per player; with one row per season this is the number of seasons.
pub fn tenure_counts(table: &SalaryTable) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in &table.records {
        *counts.entry(record.unique_name.clone()).or_insert(0) += 1;
    }
    counts
}

/// The longest tenure in the table, `None` when empty.
pub fn max_tenure(table: &SalaryTable) -> Option<usize> {
    tenure_counts(table).into_values().max()
}

/// Players whose tenure is exactly `tenure`, sorted by name.
pub fn players_with_tenure(table: &SalaryTable, tenure: usize) -> Vec<String> {
    tenure_counts(table)
        .into_iter()
        .filter(|(_, count)| *count == tenure)
        .map(|(name, _)| name)
        .collect()
}

/// One point of a player's compensation history.
#[derive(Debug, Clone, PartialEq)]
pub struct CareerPoint {
    pub unique_name: String,
    pub year: u16,
    pub compensation: f64,
}

/// Compensation history of the given players, sorted by last name then year.
pub fn career_series(table: &SalaryTable, unique_names: &[String]) -> Vec<CareerPoint> {
    let wanted: BTreeSet<&str> = unique_names.iter().map(String::as_str).collect();
    let mut rows: Vec<&PlayerSalaryRecord> = table
        .records
        .iter()
        .filter(|r| wanted.contains(r.unique_name.as_str()))
        .collect();
    rows.sort_by(|a, b| a.last_name.cmp(&b.last_name).then(a.year.cmp(&b.year)));

    rows.into_iter()
        .map(|r| CareerPoint {
            unique_name: r.unique_name.clone(),
            year: r.year,
            compensation: r.compensation,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Statistic {
    Mean,
    Median,
    Max,
    Min,
}

impl Statistic {
    pub const ALL: [Statistic; 4] = [
        Statistic::Mean,
        Statistic::Median,
        Statistic::Max,
        Statistic::Min,
    ];

    /// Apply to a non-empty slice. Reorders `values`.
    fn apply(self, values: &mut [f64]) -> f64 {
        match self {
            Statistic::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Statistic::Median => median(values),
            Statistic::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Statistic::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Statistic::Mean => "Mean",
            Statistic::Median => "Median",
            Statistic::Max => "Maximum",
            Statistic::Min => "Minimum",
        };
        f.write_str(name)
    }
}

/// Middle value, or the mean of the two middle values for an even count.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Per-season compensation statistic, rounded to cents.
pub fn yearly_statistic(table: &SalaryTable, statistic: Statistic) -> BTreeMap<u16, f64> {
    let mut by_year: BTreeMap<u16, Vec<f64>> = BTreeMap::new();
    for record in &table.records {
        by_year.entry(record.year).or_default().push(record.compensation);
    }
    by_year
        .into_iter()
        .map(|(year, mut values)| (year, round2(statistic.apply(&mut values))))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallStatistics {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
}

/// Mean, median and max over every row, rounded to cents. `None` when the
/// table is empty.
pub fn overall_statistics(table: &SalaryTable) -> Option<OverallStatistics> {
    if table.is_empty() {
        return None;
    }
    let mut values: Vec<f64> = table.records.iter().map(|r| r.compensation).collect();
    Some(OverallStatistics {
        mean: round2(Statistic::Mean.apply(&mut values)),
        median: round2(Statistic::Median.apply(&mut values)),
        max: round2(Statistic::Max.apply(&mut values)),
    })
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// `floor((max - min) / rows)`, never below [`MIN_HISTOGRAM_BINS`].
pub fn histogram_bin_count(table: &SalaryTable) -> usize {
    histogram_bin_count_with_floor(table, MIN_HISTOGRAM_BINS)
}

/// As [`histogram_bin_count`] with a caller-chosen floor (itself at least 1).
pub fn histogram_bin_count_with_floor(table: &SalaryTable, floor: usize) -> usize {
    let floor = floor.max(MIN_HISTOGRAM_BINS);
    let Some((min, max)) = compensation_range(table) else {
        return floor;
    };
    let bins = ((max - min) / table.len() as f64).floor();
    if bins.is_finite() && bins >= floor as f64 {
        bins as usize
    } else {
        floor
    }
}

fn compensation_range(table: &SalaryTable) -> Option<(f64, f64)> {
    let mut values = table.records.iter().map(|r| r.compensation);
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins spanning the compensation range. The last bin is closed
/// on the right; a zero range is widened to `value ± 0.5`. The requested
/// count is clamped to `MIN_HISTOGRAM_BINS..=MAX_HISTOGRAM_BINS`.
pub fn histogram(table: &SalaryTable, bins: usize) -> Vec<HistogramBin> {
    let Some((mut min, mut max)) = compensation_range(table) else {
        return Vec::new();
    };
    let bins = bins.clamp(MIN_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }
    let width = (max - min) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for record in &table.records {
        let idx = (((record.compensation - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Position grid
// ---------------------------------------------------------------------------

/// Per season, the (position, compensation) pair of every row, in source
/// order. Feeds the position scatter grid.
pub fn compensation_by_position(table: &SalaryTable) -> BTreeMap<u16, Vec<(Position, f64)>> {
    let mut grid: BTreeMap<u16, Vec<(Position, f64)>> = BTreeMap::new();
    for record in &table.records {
        grid.entry(record.year)
            .or_default()
            .push((record.position.clone(), record.compensation));
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Position;

    fn row(year: u16, last: &str, first: &str, comp: f64) -> PlayerSalaryRecord {
        PlayerSalaryRecord {
            team: "Team".into(),
            club: "CLB".into(),
            last_name: last.into(),
            first_name: first.into(),
            position: Position::Midfielder,
            year,
            base_salary: comp,
            compensation: comp,
            unique_name: String::new(),
        }
    }

    fn tie_table() -> SalaryTable {
        SalaryTable::from_records(vec![
            row(2020, "A", "B", 100.0),
            row(2020, "C", "D", 100.0),
            row(2021, "A", "B", 90.0),
        ])
    }

    fn names(rows: &[&PlayerSalaryRecord]) -> Vec<String> {
        rows.iter().map(|r| r.unique_name.clone()).collect()
    }

    #[test]
    fn max_per_year_keeps_every_tie() {
        let table = tie_table();
        let rows = max_compensation_per_year(&table);
        let in_2020: Vec<_> = rows.iter().copied().filter(|r| r.year == 2020).collect();
        assert_eq!(names(&in_2020), vec!["A_B", "C_D"]);
        assert_eq!(rows.last().unwrap().year, 2021);
    }

    #[test]
    fn top_n_cuts_ties_in_source_order() {
        let table = tie_table();
        let rows = top_n_per_year(&table, 1);
        let in_2020: Vec<_> = rows.iter().copied().filter(|r| r.year == 2020).collect();
        assert_eq!(names(&in_2020), vec!["A_B"]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn top_n_orders_latest_year_first_then_pay() {
        let table = SalaryTable::from_records(vec![
            row(2019, "Low", "X", 10.0),
            row(2020, "Mid", "X", 50.0),
            row(2019, "High", "X", 30.0),
            row(2020, "Top", "X", 70.0),
        ]);
        let rows = top_n_per_year(&table, 10);
        assert_eq!(names(&rows), vec!["Top_X", "Mid_X", "High_X", "Low_X"]);
    }

    #[test]
    fn tenure_counts_rows_per_player() {
        let table = tie_table();
        let counts = tenure_counts(&table);
        assert_eq!(counts["A_B"], 2);
        assert_eq!(counts["C_D"], 1);
        assert_eq!(max_tenure(&table), Some(2));
        assert_eq!(players_with_tenure(&table, 2), vec!["A_B"]);
        assert!(players_with_tenure(&table, 5).is_empty());
    }

    #[test]
    fn career_series_sorted_by_last_name_then_year() {
        let table = SalaryTable::from_records(vec![
            row(2012, "Zed", "A", 3.0),
            row(2010, "Zed", "A", 1.0),
            row(2011, "Abe", "B", 2.0),
            row(2011, "Other", "C", 9.0),
        ]);
        let series = career_series(&table, &["Zed_A".to_string(), "Abe_B".to_string()]);
        let keys: Vec<_> = series.iter().map(|p| (p.unique_name.as_str(), p.year)).collect();
        assert_eq!(keys, vec![("Abe_B", 2011), ("Zed_A", 2010), ("Zed_A", 2012)]);
    }

    #[test]
    fn yearly_statistics_round_to_cents() {
        let table = SalaryTable::from_records(vec![
            row(2020, "A", "A", 1.0),
            row(2020, "B", "B", 2.0),
            row(2020, "C", "C", 2.0),
            row(2021, "D", "D", 10.0),
            row(2021, "E", "E", 15.0),
        ]);
        assert_eq!(yearly_statistic(&table, Statistic::Mean)[&2020], 1.67);
        assert_eq!(yearly_statistic(&table, Statistic::Median)[&2020], 2.0);
        assert_eq!(yearly_statistic(&table, Statistic::Median)[&2021], 12.5);
        assert_eq!(yearly_statistic(&table, Statistic::Max)[&2021], 15.0);
        assert_eq!(yearly_statistic(&table, Statistic::Min)[&2021], 10.0);
    }

    #[test]
    fn half_cents_round_to_even() {
        let table = SalaryTable::from_records(vec![
            row(2020, "A", "A", 1234.0),
            row(2020, "B", "B", 1234.25),
        ]);
        assert_eq!(yearly_statistic(&table, Statistic::Mean)[&2020], 1234.12);
        let stats = overall_statistics(&table).unwrap();
        assert_eq!(stats.mean, 1234.12);
        assert_eq!(stats.median, 1234.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn overall_statistics_cover_all_years() {
        let table = tie_table();
        let stats = overall_statistics(&table).unwrap();
        assert_eq!(stats.mean, 96.67);
        assert_eq!(stats.median, 100.0);
        assert_eq!(stats.max, 100.0);
        assert_eq!(overall_statistics(&SalaryTable::from_records(Vec::new())), None);
    }

    #[test]
    fn bin_count_follows_range_over_rows() {
        let table = SalaryTable::from_records(vec![
            row(2020, "A", "A", 0.0),
            row(2020, "B", "B", 1000.0),
        ]);
        assert_eq!(histogram_bin_count(&table), 500);
    }

    #[test]
    fn bin_count_floors_at_one() {
        let single = SalaryTable::from_records(vec![row(2020, "A", "A", 5.0)]);
        assert_eq!(histogram_bin_count(&single), 1);

        let flat = SalaryTable::from_records(vec![
            row(2020, "A", "A", 5.0),
            row(2021, "A", "A", 5.0),
        ]);
        assert_eq!(histogram_bin_count(&flat), 1);

        assert_eq!(histogram_bin_count(&SalaryTable::from_records(Vec::new())), 1);
        assert_eq!(histogram_bin_count_with_floor(&flat, 10), 10);
    }

    #[test]
    fn histogram_counts_every_row_once() {
        let table = SalaryTable::from_records(vec![
            row(2020, "A", "A", 0.0),
            row(2020, "B", "B", 5.0),
            row(2020, "C", "C", 10.0),
            row(2020, "D", "D", 10.0),
        ]);
        let bins = histogram(&table, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 3);
        assert_eq!(bins[1].end, 10.0);
    }

    #[test]
    fn wide_range_builds_bounded_bins() {
        let table = SalaryTable::from_records(vec![
            row(2020, "A", "A", 0.0),
            row(2020, "B", "B", 1e9),
        ]);
        let requested = histogram_bin_count(&table);
        assert_eq!(requested, 500_000_000);

        let bins = histogram(&table, requested);
        assert_eq!(bins.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(bins[MAX_HISTOGRAM_BINS - 1].end, 1e9);
    }

    #[test]
    fn histogram_of_flat_data_has_width() {
        let table = SalaryTable::from_records(vec![row(2020, "A", "A", 7.0)]);
        let bins = histogram(&table, 1);
        assert_eq!(bins[0].width(), 1.0);
        assert_eq!(bins[0].center(), 7.0);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn position_grid_groups_by_year() {
        let table = tie_table();
        let grid = compensation_by_position(&table);
        assert_eq!(grid[&2020].len(), 2);
        assert_eq!(grid[&2021], vec![(Position::Midfielder, 90.0)]);
    }
}
