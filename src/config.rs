//! Configuration
//!
//! File locations are resolved from one data directory handed in by the
//! caller. Nothing in the library computes paths from process-wide state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const HERBS_FILE: &str = "herbs.csv";
pub const SYMPTOMS_FILE: &str = "symptoms.csv";
pub const EFFECTS_FILE: &str = "herb_symptom_effects.csv";
pub const RAW_FILE: &str = "raw_herbs.csv";
pub const CLEAN_FILE: &str = "raw_herbs_clean.csv";

/// Number of therapeutic options returned when the caller does not ask
pub const DEFAULT_LIMIT: usize = 3;

/// Locations of the dataset files inside a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn herbs(&self) -> PathBuf {
        self.data_dir.join(HERBS_FILE)
    }

    pub fn symptoms(&self) -> PathBuf {
        self.data_dir.join(SYMPTOMS_FILE)
    }

    pub fn effects(&self) -> PathBuf {
        self.data_dir.join(EFFECTS_FILE)
    }

    pub fn raw(&self) -> PathBuf {
        self.data_dir.join(RAW_FILE)
    }

    pub fn clean(&self) -> PathBuf {
        self.data_dir.join(CLEAN_FILE)
    }
}

/// Runtime settings for the recommender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_limit: default_limit(),
        }
    }
}

impl RecommenderConfig {
    /// Load settings from a JSON file; missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: RecommenderConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        if config.default_limit == 0 {
            anyhow::bail!("default_limit must be at least 1");
        }

        Ok(config)
    }

    /// Settings from `HERBAL_DATA_DIR` / `HERBAL_TOP_N`, defaults otherwise
    pub fn from_env() -> Self {
        let data_dir = std::env::var("HERBAL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let default_limit = std::env::var("HERBAL_TOP_N")
            .ok()
            .and_then(|n| n.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(DEFAULT_LIMIT);

        Self { data_dir, default_limit }
    }

    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir)
    }
}
