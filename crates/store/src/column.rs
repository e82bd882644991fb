//! Column-name validation.
//!
//! Pollutant codes arrive from the remote feed and end up interpolated into
//! DDL, so anything outside a conservative identifier alphabet is rejected
//! before it reaches the database.

use aq_core::{Error, Result};

/// Maximum accepted column-name length.
const MAX_COLUMN_NAME_LEN: usize = 64;

/// Validates a column name for use as a store identifier.
///
/// Accepts ASCII letters, digits and underscores; the first character must
/// not be a digit.
pub fn validate_column_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_COLUMN_NAME_LEN {
        return Err(Error::invalid_column(name));
    }

    let mut chars = name.chars();
    let first = chars.next().expect("non-empty checked above");
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(Error::invalid_column(name));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::invalid_column(name));
    }

    Ok(())
}
