use std::collections::{BTreeMap, BTreeSet};

use super::aggregate::{
    career_series, compensation_by_position, histogram, histogram_bin_count_with_floor,
    max_compensation_per_year, overall_statistics, top_n_per_year, yearly_statistic, CareerPoint,
    HistogramBin, OverallStatistics, Statistic, MIN_HISTOGRAM_BINS,
};
use super::filter::{
    distinct_teams_for_year, players_for_tenure_bucket, records_by_last_name, records_by_team,
    records_for_year, years_descending, Selection, TenureSelection, TENURE_UPPER_BOUND,
};
use super::model::{DashboardData, PlayerSalaryRecord, Position, PositionRatioRecord, TopN};

/// Size of the per-season top list in the "highest paid" section.
pub const TOP_PAID_PER_YEAR: usize = 10;

/// Everything the sidebar lets the user choose.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionParams {
    /// Season for the top-ten chart; `None` means latest.
    pub top_ten_year: Option<u16>,
    pub top_n: TopN,
    pub show_position_grid: bool,
    /// Tenure selector value, see [`super::filter::TENURE_BUCKETS`].
    pub tenure_years: u32,
    pub surname: String,
    pub show_teams: bool,
    /// Season for the team list; `None` means latest.
    pub team_year: Option<u16>,
    pub team_name: String,
    pub histogram_min_bins: usize,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            top_ten_year: None,
            top_n: TopN::Ten,
            show_position_grid: false,
            tenure_years: TENURE_UPPER_BOUND,
            surname: "Vela".to_string(),
            show_teams: true,
            team_year: None,
            team_name: "Real Salt Lake".to_string(),
            histogram_min_bins: MIN_HISTOGRAM_BINS,
        }
    }
}

/// Every section of the dashboard, derived in one pass from the loaded data
/// and the current selection.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub highest_paid: Vec<&'a PlayerSalaryRecord>,
    /// Seasons offered by the top-ten selector, latest first.
    pub top_ten_years: Vec<u16>,
    pub top_ten_year: Option<u16>,
    pub top_ten: Selection<&'a PlayerSalaryRecord>,

    pub league_positions: &'a [PositionRatioRecord],
    pub top_positions: &'a [PositionRatioRecord],
    pub position_grid: Option<BTreeMap<u16, Vec<(Position, f64)>>>,

    pub tenure: TenureSelection,
    pub careers: Vec<CareerPoint>,

    pub overall: Option<OverallStatistics>,
    pub histogram: Vec<HistogramBin>,
    pub yearly: Vec<(Statistic, BTreeMap<u16, f64>)>,

    pub player_rows: Selection<&'a PlayerSalaryRecord>,
    pub team_year: Option<u16>,
    pub teams: Option<BTreeSet<String>>,
    pub team_rows: Selection<&'a PlayerSalaryRecord>,
}

impl<'a> DashboardView<'a> {
    pub fn compute(data: &'a DashboardData, params: &SelectionParams) -> Self {
        let table = &data.salaries;
        let years = years_descending(table);

        let top_ten_all = top_n_per_year(table, TOP_PAID_PER_YEAR);
        let top_ten_year = params.top_ten_year.or_else(|| years.first().copied());
        let top_ten: Selection<&PlayerSalaryRecord> = top_ten_year
            .map(|year| records_for_year(&top_ten_all, year))
            .unwrap_or_default()
            .into();

        let tenure = players_for_tenure_bucket(table, params.tenure_years);
        let careers = career_series(table, &tenure.players);

        let bins = histogram_bin_count_with_floor(table, params.histogram_min_bins);

        let team_year = params.team_year.or_else(|| years.first().copied());
        let teams = match (params.show_teams, team_year) {
            (true, Some(year)) => Some(distinct_teams_for_year(table, year)),
            _ => None,
        };

        DashboardView {
            highest_paid: max_compensation_per_year(table),
            top_ten_years: years,
            top_ten_year,
            top_ten,
            league_positions: &data.league_positions,
            top_positions: data.top_positions(params.top_n),
            position_grid: params
                .show_position_grid
                .then(|| compensation_by_position(table)),
            tenure,
            careers,
            overall: overall_statistics(table),
            histogram: histogram(table, bins),
            yearly: Statistic::ALL
                .into_iter()
                .map(|stat| (stat, yearly_statistic(table, stat)))
                .collect(),
            player_rows: records_by_last_name(table, &params.surname).into(),
            team_year,
            teams,
            team_rows: records_by_team(table, &params.team_name).into(),
        }
    }
}
