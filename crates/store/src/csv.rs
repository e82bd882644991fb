//! Legacy delimited-file backend.
//!
//! One file per city (`waqi_<city>.csv`) under a directory. Rows are appended
//! in ingestion order, and the header row is rewritten on every append so
//! that earlier rows gain empty cells when the column set widens. Row ids are
//! positional (1-based file order). Kept for deployments that predate the
//! SQLite backend; it satisfies the same read contract.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use aq_core::{canonical_city, Error, MeasurementRow, Result};

use crate::column::validate_column_name;
use crate::read::{value_text, MeasurementReader, MeasurementStore, StoredRow};

const FILE_PREFIX: &str = "waqi_";
const FILE_SUFFIX: &str = ".csv";

/// Directory of per-city delimited files.
pub struct CsvStore {
    dir: PathBuf,
    // Guards the read-modify-rewrite cycle of append.
    write_lock: Mutex<()>,
}

impl CsvStore {
    /// Opens the store rooted at `dir`. The directory itself is created
    /// lazily on first append.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Builds the per-city file path. City names come from the dashboard
    /// route as well as the feed, so anything that could address a file
    /// outside the store directory is rejected.
    fn city_path(&self, city: &str) -> Result<PathBuf> {
        let canonical = canonical_city(city);
        if canonical.is_empty()
            || canonical.contains(['/', '\\'])
            || canonical.contains("..")
        {
            return Err(Error::storage(format!("unsafe city name {city:?}")));
        }
        Ok(self
            .dir
            .join(format!("{FILE_PREFIX}{canonical}{FILE_SUFFIX}")))
    }

    fn read_file(path: &Path) -> Result<Option<(Vec<String>, Vec<Vec<String>>)>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        let mut lines = text.lines();
        let header = match lines.next() {
            Some(line) => parse_line(line),
            None => return Ok(None),
        };
        let rows = lines
            .filter(|l| !l.is_empty())
            .map(parse_line)
            .collect::<Vec<_>>();
        Ok(Some((header, rows)))
    }

    fn write_file(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
        let mut out = String::new();
        out.push_str(&render_line(header));
        out.push('\n');
        for row in rows {
            out.push_str(&render_line(row));
            out.push('\n');
        }
        fs::write(path, out)
            .map_err(|e| Error::storage(format!("failed to write {}: {e}", path.display())))
    }

    fn row_from_record(header: &[String], record: &[String], id: i64) -> StoredRow {
        let mut city = String::new();
        let mut timestamp = String::new();
        let mut values = BTreeMap::new();
        for (i, name) in header.iter().enumerate() {
            let cell = record.get(i).map(String::as_str).unwrap_or("");
            match name.as_str() {
                "city" => city = cell.to_string(),
                "timestamp" => timestamp = cell.to_string(),
                _ => {
                    let value = if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    };
                    values.insert(name.clone(), value);
                }
            }
        }
        StoredRow {
            id,
            city,
            timestamp,
            values,
        }
    }
}

impl MeasurementStore for CsvStore {
    fn append(&self, row: &MeasurementRow) -> Result<i64> {
        for code in row.pollutant_codes() {
            validate_column_name(code)?;
        }

        let _guard = self.write_lock.lock();
        let path = self.city_path(&row.city)?;
        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::storage(format!("failed to create {}: {e}", self.dir.display())))?;

        let (mut header, mut rows) = Self::read_file(&path)?
            .unwrap_or_else(|| (vec!["city".to_string(), "timestamp".to_string()], Vec::new()));

        // Widen the header with unseen codes; old rows are padded on render.
        for code in row.pollutant_codes() {
            if !header.iter().any(|c| c == code) {
                header.push(code.to_string());
            }
        }
        for existing in &mut rows {
            existing.resize(header.len(), String::new());
        }

        let mut record = vec![String::new(); header.len()];
        for (i, name) in header.iter().enumerate() {
            record[i] = match name.as_str() {
                "city" => row.city.clone(),
                "timestamp" => row.timestamp_text(),
                code => row
                    .values
                    .get(code)
                    .and_then(|v| v.map(value_text))
                    .unwrap_or_default(),
            };
        }
        rows.push(record);

        Self::write_file(&path, &header, &rows)?;
        let id = rows.len() as i64;
        debug!(city = %row.city, id, path = %path.display(), "Appended row to city file");
        Ok(id)
    }
}

impl MeasurementReader for CsvStore {
    fn cities(&self) -> Result<Vec<String>> {
        // The directory only appears on first append.
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::storage(format!(
                    "failed to list {}: {e}",
                    self.dir.display()
                )))
            }
        };

        let mut cities = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::storage(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(city) = name
                .strip_prefix(FILE_PREFIX)
                .and_then(|n| n.strip_suffix(FILE_SUFFIX))
            {
                cities.push(city.to_string());
            }
        }
        cities.sort();
        Ok(cities)
    }

    fn rows_for_city(&self, city: &str) -> Result<Vec<StoredRow>> {
        let path = self.city_path(city)?;
        let Some((header, records)) = Self::read_file(&path)? else {
            return Ok(Vec::new());
        };

        // File order is insertion order; newest first for the reader.
        let mut rows: Vec<StoredRow> = records
            .iter()
            .enumerate()
            .map(|(i, record)| Self::row_from_record(&header, record, i as i64 + 1))
            .collect();
        rows.reverse();
        Ok(rows)
    }

    fn columns(&self) -> Result<Vec<String>> {
        let cities = self.cities()?;
        if cities.is_empty() {
            return Ok(Vec::new());
        }

        // Union of all per-city headers, meta columns first.
        let mut columns: Vec<String> = vec!["city".to_string(), "timestamp".to_string()];
        for city in cities {
            if let Some((header, _)) = Self::read_file(&self.city_path(&city)?)? {
                for name in header {
                    if !columns.contains(&name) {
                        columns.push(name);
                    }
                }
            }
        }
        Ok(columns)
    }
}

/// Minimal field quoting: only needed when a field contains the delimiter,
/// a quote, or a newline.
fn render_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| {
            if f.contains(',') || f.contains('"') || f.contains('\n') {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}
