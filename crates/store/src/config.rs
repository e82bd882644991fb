//! Store configuration and backend selection.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use aq_core::Result;

use crate::csv::CsvStore;
use crate::read::MeasurementStore;
use crate::sqlite::SqliteStore;

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Single SQLite database file (default).
    #[default]
    Sqlite,
    /// Legacy per-city delimited files under a directory.
    Csv,
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database file (sqlite) or directory (csv).
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("data/waqi_data.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_path(),
        }
    }
}

/// Opens the configured backend.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn MeasurementStore>> {
    Ok(match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(&config.path)?),
        StoreBackend::Csv => Arc::new(CsvStore::open(&config.path)?),
    })
}
