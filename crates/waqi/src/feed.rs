//! Feed response payload and flattening.
//!
//! The feed returns `{"status": "ok", "data": {"iaqi": {code: {"v": n}}}}`.
//! Flattening keeps only the scalar `v` of each `iaqi` entry; any other
//! nested metadata (including source-reported measurement times) is dropped.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level feed response.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    /// "ok" on success; anything else means no coverage for the city.
    pub status: String,
    #[serde(default)]
    pub data: Option<FeedData>,
}

impl FeedResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// `data` object of a successful response.
#[derive(Debug, Deserialize)]
pub struct FeedData {
    /// Pollutant index entries, keyed by pollutant code.
    #[serde(default)]
    pub iaqi: BTreeMap<String, IaqiEntry>,
}

/// One pollutant index entry. Only the scalar value is of interest.
#[derive(Debug, Deserialize)]
pub struct IaqiEntry {
    #[serde(default)]
    pub v: Option<f64>,
}

/// Flattens the nested pollutant index into code -> optional value.
pub fn flatten(data: &FeedData) -> BTreeMap<String, Option<f64>> {
    data.iaqi
        .iter()
        .map(|(code, entry)| (code.clone(), entry.v))
        .collect()
}
