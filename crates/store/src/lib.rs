//! Persistent measurement stores.
//!
//! The primary backend is a single SQLite table whose column set widens as
//! new pollutant codes appear. A legacy delimited-file backend (one file per
//! city) implements the same read contract for older deployments.

pub mod column;
pub mod config;
pub mod csv;
pub mod read;
pub mod sqlite;

pub use config::{open_store, StoreBackend, StoreConfig};
pub use csv::CsvStore;
pub use read::{MeasurementReader, MeasurementStore, StoredRow};
pub use sqlite::SqliteStore;
