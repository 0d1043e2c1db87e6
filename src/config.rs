use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{FrequencyFormula, Threshold};
use crate::source::ClientConfig;
use crate::types::stop_list::AnalysisError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("num_pages must be at least 1")]
    NoPages,
    #[error("max_attempts_per_page must be at least 1")]
    NoAttempts,
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

// Key point:
// Serializable
// Every key optional in files
// Explicit defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopListConfig {
    pub num_pages: usize,
    /// Maximum terms written; None keeps every qualifying term.
    pub limit: Option<usize>,
    pub threshold: Threshold,
    pub formula: FrequencyFormula,
    pub max_attempts_per_page: usize,
    pub seed: Option<u64>,
    /// Staging file for the one-hot matrix; None skips staging.
    pub one_hot_path: Option<PathBuf>,
    pub stop_list_path: PathBuf,
    pub client: ClientConfig,
}

impl Default for StopListConfig {
    fn default() -> Self {
        Self::v0()
    }
}

impl StopListConfig {
    pub fn v0() -> Self {
        Self {
            num_pages: 50,
            limit: Some(100),
            threshold: Threshold::Mean,
            formula: FrequencyFormula::OverTotal,
            max_attempts_per_page: 10,
            seed: None,
            one_hot_path: Some(PathBuf::from("one_hot.csv")),
            stop_list_path: PathBuf::from("stop_list.txt"),
            client: ClientConfig::default(),
        }
    }

    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// `STOPLIST_*` variables override client settings only.
    pub fn with_env_overrides(mut self) -> Self {
        self.client = self.client.with_env_overrides();
        self
    }

    /// Same as `with_env_overrides`, reading variables through `lookup`.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.client = self.client.with_overrides_from(lookup);
        self
    }

    /// CLI flags win over everything loaded before them.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(n) = overrides.num_pages {
            self.num_pages = n;
        }
        if let Some(limit) = overrides.limit {
            self.limit = Some(limit);
        }
        if let Some(freq) = overrides.term_freq {
            self.threshold = Threshold::Fixed(freq);
        }
        if let Some(formula) = overrides.formula {
            self.formula = formula;
        }
        if let Some(path) = &overrides.one_hot_path {
            self.one_hot_path = Some(path.clone());
        }
        if overrides.no_stage {
            self.one_hot_path = None;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if let Some(path) = &overrides.stop_list_path {
            self.stop_list_path = path.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_pages == 0 {
            return Err(ConfigError::NoPages);
        }
        if self.max_attempts_per_page == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if self.limit == Some(0) {
            return Err(AnalysisError::InvalidLimit.into());
        }
        self.threshold.validate(self.formula)?;
        Ok(())
    }
}

/// Command-line settings; `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub num_pages: Option<usize>,
    pub limit: Option<usize>,
    /// Switches the threshold to `Threshold::Fixed`.
    pub term_freq: Option<f64>,
    pub formula: Option<FrequencyFormula>,
    pub one_hot_path: Option<PathBuf>,
    /// Drops staging even when `one_hot_path` is given.
    pub no_stage: bool,
    pub seed: Option<u64>,
    pub stop_list_path: Option<PathBuf>,
}
