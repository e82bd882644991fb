//! Read and write contracts shared by the store backends.

use std::collections::BTreeMap;

use serde::Serialize;

use aq_core::{MeasurementRow, Result};

/// One row read back from a store.
///
/// Values come back as optional text: the store is deliberately untyped, and
/// readers coerce back to numbers only where they need to (charting).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRow {
    /// Surrogate identity assigned by the store.
    pub id: i64,
    pub city: String,
    pub timestamp: String,
    /// Pollutant columns only; `None` for columns added after this row was
    /// inserted or stored as null.
    pub values: BTreeMap<String, Option<String>>,
}

/// Read-only surface handed to the dashboard.
pub trait MeasurementReader: Send + Sync {
    /// Distinct stored cities, sorted. Empty when the store does not exist
    /// yet.
    fn cities(&self) -> Result<Vec<String>>;

    /// All rows for a city, newest first.
    fn rows_for_city(&self, city: &str) -> Result<Vec<StoredRow>>;

    /// Current column set, in schema order. Empty before the first ingest.
    fn columns(&self) -> Result<Vec<String>>;

    /// The most recent row's pollutant values, for charting.
    fn latest_pollutants(&self, city: &str) -> Result<BTreeMap<String, Option<String>>> {
        Ok(self
            .rows_for_city(city)?
            .into_iter()
            .next()
            .map(|row| row.values)
            .unwrap_or_default())
    }
}

/// Full store contract. Appending is the only mutation; the store owns all
/// schema widening.
pub trait MeasurementStore: MeasurementReader {
    /// Appends one row, widening the schema first if the row carries unseen
    /// pollutant codes. Returns the surrogate row id. Durable on return.
    fn append(&self, row: &MeasurementRow) -> Result<i64>;
}

/// Renders a measurement value the way the stores persist it: integral
/// values without a trailing `.0`.
pub fn value_text(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
