use std::path::Path;

use anyhow::{Context, Result};
use mls_salaries::config::DashboardConfig;
use mls_salaries::data::loader::load_dashboard;
use mls_salaries::data::model::{DashboardData, Position};
use mls_salaries::data::view::SelectionParams;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Tables loaded at startup or from File → Open.
    pub data: DashboardData,

    /// Current sidebar choices.
    pub selection: SelectionParams,

    /// Bar colours by club in the top-ten chart.
    pub club_colors: ColorMap,

    /// Bar colours by surname in the highest-paid chart.
    pub surname_colors: ColorMap,

    /// Point colours by position in the position grid.
    pub position_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, data: DashboardData) -> Self {
        let selection = SelectionParams {
            surname: config.default_surname.clone(),
            team_name: config.default_team.clone(),
            histogram_min_bins: config.histogram_min_bins,
            ..SelectionParams::default()
        };
        let mut state = Self {
            config,
            data,
            selection,
            club_colors: ColorMap::default(),
            surname_colors: ColorMap::default(),
            position_colors: ColorMap::default(),
            status_message: None,
        };
        state.rebuild_color_maps();
        state
    }

    /// Ingest newly loaded tables. Year choices fall back to the latest
    /// season of the new data.
    pub fn set_data(&mut self, data: DashboardData) {
        self.data = data;
        self.selection.top_ten_year = None;
        self.selection.team_year = None;
        self.rebuild_color_maps();
        self.status_message = None;
    }

    /// Load every table from another directory, keeping the configured
    /// file names.
    pub fn reload_from(&mut self, dir: &Path) -> Result<()> {
        let mut config = self.config.clone();
        config.data_dir = dir.to_path_buf();
        let data = load_dashboard(&config)
            .with_context(|| format!("loading tables from {}", dir.display()))?;
        self.config = config;
        self.set_data(data);
        Ok(())
    }

    fn rebuild_color_maps(&mut self) {
        let records = &self.data.salaries.records;
        self.club_colors = ColorMap::new(records.iter().map(|r| r.club.clone()));
        self.surname_colors = ColorMap::new(records.iter().map(|r| r.last_name.clone()));
        self.position_colors = ColorMap::new(
            Position::KNOWN
                .iter()
                .chain(records.iter().map(|r| &r.position))
                .map(|p| p.code().to_string()),
        );
    }
}
