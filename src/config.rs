use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::aggregate::MIN_HISTOGRAM_BINS;
use crate::data::model::TopN;

/// Name of the optional config file looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "dashboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// File names of the tables, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub salaries: String,
    pub league_positions: String,
    pub top_ten_positions: String,
    pub top_twenty_five_positions: String,
    pub top_fifty_positions: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            salaries: "mls_clean.csv".to_string(),
            league_positions: "player_ratio_pos_mls.csv".to_string(),
            top_ten_positions: "top_ten_paid_obs_exp.csv".to_string(),
            top_twenty_five_positions: "top_twenty_five_paid_obs_exp.csv".to_string(),
            top_fifty_positions: "top_fifty_paid_obs_exp.csv".to_string(),
        }
    }
}

impl DataFiles {
    pub fn top_positions(&self, top_n: TopN) -> &str {
        match top_n {
            TopN::Ten => &self.top_ten_positions,
            TopN::TwentyFive => &self.top_twenty_five_positions,
            TopN::Fifty => &self.top_fifty_positions,
        }
    }

    fn all(&self) -> [(&'static str, &str); 5] {
        [
            ("salaries", &self.salaries),
            ("league_positions", &self.league_positions),
            ("top_ten_positions", &self.top_ten_positions),
            ("top_twenty_five_positions", &self.top_twenty_five_positions),
            ("top_fifty_positions", &self.top_fifty_positions),
        ]
    }
}

/// Dashboard settings. Every field has a default so an absent or partial
/// file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory the table files are resolved against.
    pub data_dir: PathBuf,
    pub files: DataFiles,
    /// Lower bound for the compensation histogram bin count.
    pub histogram_min_bins: usize,
    /// Surname pre-filled in the player lookup.
    pub default_surname: String,
    /// Team pre-filled in the team lookup.
    pub default_team: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            files: DataFiles::default(),
            histogram_min_bins: MIN_HISTOGRAM_BINS,
            default_surname: "Vela".to_string(),
            default_team: "Real Salt Lake".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a specific path.
    ///
    /// Returns the defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config for a data directory: an explicit file wins, then
    /// `<data_dir>/dashboard.toml`, then the defaults. `data_dir` always
    /// overrides whatever the file says.
    pub fn resolve(data_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match (explicit, data_dir) {
            (Some(path), _) => Self::load_from(path)?,
            (None, Some(dir)) => Self::load_from(&dir.join(CONFIG_FILE_NAME))?,
            (None, None) => Self::load_from(&Self::default().data_dir.join(CONFIG_FILE_NAME))?,
        };
        if let Some(dir) = data_dir {
            config.data_dir = dir.to_path_buf();
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_min_bins == 0 {
            return Err(ConfigError::Invalid(
                "histogram_min_bins must be at least 1".to_string(),
            ));
        }
        for (key, name) in self.files.all() {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("files.{key} is empty")));
            }
        }
        Ok(())
    }

    pub fn salaries_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.salaries)
    }

    pub fn league_positions_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.league_positions)
    }

    pub fn top_positions_path(&self, top_n: TopN) -> PathBuf {
        self.data_dir.join(self.files.top_positions(top_n))
    }
}
