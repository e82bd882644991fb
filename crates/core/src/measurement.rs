//! Measurement rows and per-city fetch outcomes.
//!
//! A measurement row is a flat mapping of pollutant code to an optional
//! numeric value, plus the city it was measured for and the UTC instant it
//! was fetched at. The set of pollutant codes is open: different cities (and
//! different calls for the same city) report different code sets, and the
//! store widens its schema as new codes appear.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One flattened air-quality measurement, the unit of ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRow {
    /// City identifier, canonicalized to lowercase.
    pub city: String,
    /// Fetch-time UTC instant. Source-reported measurement times are
    /// discarded on purpose.
    pub timestamp: DateTime<Utc>,
    /// Pollutant code -> value. `None` means the source listed the code but
    /// carried no scalar for it.
    pub values: BTreeMap<String, Option<f64>>,
}

impl MeasurementRow {
    /// Creates a row timestamped now.
    pub fn new(city: &str, values: BTreeMap<String, Option<f64>>) -> Self {
        Self {
            city: canonical_city(city),
            timestamp: Utc::now(),
            values,
        }
    }

    /// Creates a row with an explicit timestamp (tests, replays).
    pub fn with_timestamp(
        city: &str,
        timestamp: DateTime<Utc>,
        values: BTreeMap<String, Option<f64>>,
    ) -> Self {
        Self {
            city: canonical_city(city),
            timestamp,
            values,
        }
    }

    /// Timestamp rendered the way the store persists it.
    pub fn timestamp_text(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Pollutant codes present in this row, in sorted order.
    pub fn pollutant_codes(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Lowercases a city name for storage and lookups.
pub fn canonical_city(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Capitalizes a stored city name for display.
pub fn display_city(city: &str) -> String {
    let mut chars = city.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Result of fetching one city from the remote feed.
///
/// `NoData` is a valid terminal outcome (the source has no station coverage
/// for the city), not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The feed returned a measurement.
    Row(MeasurementRow),
    /// The feed reported non-ok status; there is nothing to persist.
    NoData,
}

impl FetchOutcome {
    pub fn row(&self) -> Option<&MeasurementRow> {
        match self {
            Self::Row(row) => Some(row),
            Self::NoData => None,
        }
    }
}

/// Per-city outcome of a batch run.
///
/// Failures are captured per city so one city cannot abort the rest of the
/// batch.
#[derive(Debug)]
pub enum CityOutcome {
    /// Row fetched and persisted under the given surrogate id.
    Stored { row: MeasurementRow, id: i64 },
    /// The feed had no coverage for this city.
    NoData,
    /// Fetch or persistence failed for this city only.
    Failed(Error),
}

impl CityOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// One entry of a batch report, in request order.
#[derive(Debug)]
pub struct CityReport {
    /// City name as requested by the caller (not canonicalized).
    pub city: String,
    pub outcome: CityOutcome,
}
