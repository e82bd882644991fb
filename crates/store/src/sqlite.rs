//! SQLite-backed schema-evolving store.
//!
//! All measurements live in one `air_quality` table. The table is created on
//! first ingest with exactly the columns of the first row (plus the surrogate
//! `id`); later rows carrying unseen pollutant codes widen the table with
//! `ALTER TABLE ... ADD COLUMN`. Columns are never removed, and rows inserted
//! before a column existed read back NULL for it. All data columns are TEXT.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

use aq_core::{canonical_city, Error, MeasurementRow, Result};

use crate::column::validate_column_name;
use crate::read::{value_text, MeasurementReader, MeasurementStore, StoredRow};

const TABLE: &str = "air_quality";
const BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Single-writer SQLite store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (and lazily creates) the database at `path`.
    ///
    /// The table itself is not created here; it appears on first ingest with
    /// the first row's columns.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::storage(format!("failed to create {}: {e}", parent.display())))?;
        }

        let conn = Connection::open(&path)
            .map_err(|e| Error::storage(format!("failed to open {}: {e}", path.display())))?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(db_err)?;

        debug!(path = %path.display(), "Opened measurement store");
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn table_exists(conn: &Connection) -> Result<bool> {
        let name: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![TABLE],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        Ok(name.is_some())
    }

    fn existing_columns(conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({TABLE})"))
            .map_err(db_err)?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(db_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(columns)
    }

    fn create_table(tx: &Transaction<'_>, columns: &[String]) -> Result<()> {
        let col_defs = columns
            .iter()
            .map(|c| format!("\"{c}\" TEXT"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "CREATE TABLE {TABLE} (id INTEGER PRIMARY KEY AUTOINCREMENT, {col_defs})"
        );
        tx.execute(&sql, []).map_err(db_err)?;
        info!(columns = columns.len(), "Created measurement table");
        Ok(())
    }

    /// Adds any columns of the incoming row the table does not have yet.
    /// Existing rows read back NULL for them.
    fn widen(tx: &Transaction<'_>, incoming: &[String]) -> Result<()> {
        let existing = Self::existing_columns(tx)?;
        for column in incoming {
            if !existing.iter().any(|c| c == column) {
                tx.execute(
                    &format!("ALTER TABLE {TABLE} ADD COLUMN \"{column}\" TEXT"),
                    [],
                )
                .map_err(db_err)?;
                info!(column = %column, "Widened schema with new column");
            }
        }
        Ok(())
    }

    /// Flattens a row into (column, optional text value) pairs, metadata
    /// columns first.
    fn flatten(row: &MeasurementRow) -> Vec<(String, Option<String>)> {
        let mut flat = Vec::with_capacity(row.values.len() + 2);
        flat.push(("city".to_string(), Some(row.city.clone())));
        flat.push(("timestamp".to_string(), Some(row.timestamp_text())));
        for (code, value) in &row.values {
            flat.push((code.clone(), value.map(value_text)));
        }
        flat
    }
}

impl MeasurementStore for SqliteStore {
    fn append(&self, row: &MeasurementRow) -> Result<i64> {
        let flat = Self::flatten(row);
        for (name, _) in &flat {
            validate_column_name(name)?;
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;

        let columns: Vec<String> = flat.iter().map(|(name, _)| name.clone()).collect();
        if Self::table_exists(&tx)? {
            Self::widen(&tx, &columns)?;
        } else {
            Self::create_table(&tx, &columns)?;
        }

        let quoted = columns
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        tx.execute(
            &format!("INSERT INTO {TABLE} ({quoted}) VALUES ({placeholders})"),
            params_from_iter(flat.iter().map(|(_, value)| value.clone())),
        )
        .map_err(db_err)?;

        let id = tx.last_insert_rowid();
        tx.commit().map_err(db_err)?;

        debug!(city = %row.city, id, "Appended measurement row");
        Ok(id)
    }
}

impl MeasurementReader for SqliteStore {
    fn cities(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        if !Self::table_exists(&conn)? {
            return Ok(Vec::new());
        }
        let mut stmt = conn
            .prepare(&format!("SELECT DISTINCT city FROM {TABLE} ORDER BY city"))
            .map_err(db_err)?;
        let cities = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(cities)
    }

    fn rows_for_city(&self, city: &str) -> Result<Vec<StoredRow>> {
        let conn = self.conn.lock();
        if !Self::table_exists(&conn)? {
            return Ok(Vec::new());
        }

        let mut stmt = conn
            .prepare(&format!(
                "SELECT * FROM {TABLE} WHERE city = ?1 ORDER BY timestamp DESC, id DESC"
            ))
            .map_err(db_err)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let rows = stmt
            .query_map(params![canonical_city(city)], |row| {
                let mut id = 0i64;
                let mut city = String::new();
                let mut timestamp = String::new();
                let mut values = BTreeMap::new();
                for (i, name) in names.iter().enumerate() {
                    match name.as_str() {
                        "id" => id = row.get(i)?,
                        "city" => city = row.get(i)?,
                        "timestamp" => timestamp = row.get(i)?,
                        _ => {
                            values.insert(name.clone(), row.get::<_, Option<String>>(i)?);
                        }
                    }
                }
                Ok(StoredRow {
                    id,
                    city,
                    timestamp,
                    values,
                })
            })
            .map_err(db_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_err)?;

        Ok(rows)
    }

    fn columns(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        if !Self::table_exists(&conn)? {
            return Ok(Vec::new());
        }
        Self::existing_columns(&conn)
    }
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::storage(e.to_string())
}
