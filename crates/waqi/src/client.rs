//! WAQI feed client.

use std::time::Duration;

use tracing::{debug, info};

use aq_core::{Error, FetchOutcome, MeasurementRow, Result};

use crate::config::WaqiConfig;
use crate::feed::{self, FeedResponse};

/// HTTP client for the WAQI feed endpoint.
#[derive(Debug, Clone)]
pub struct WaqiClient {
    http: reqwest::Client,
    config: WaqiConfig,
}

impl WaqiClient {
    /// Creates a new client with the configured timeout.
    pub fn new(config: WaqiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WaqiConfig {
        &self.config
    }

    /// Fetches the current measurement for one city.
    ///
    /// Returns `FetchOutcome::NoData` when the feed reports non-ok status for
    /// the city; that is a valid outcome, not an error. The returned row is
    /// timestamped with the current UTC instant.
    ///
    /// A missing token fails with a configuration error before any network
    /// call is made.
    pub async fn fetch_city(&self, city: &str) -> Result<FetchOutcome> {
        if city.trim().is_empty() {
            return Err(Error::config("city name must not be empty"));
        }

        let token = self
            .config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::config(
                    "WAQI API token is not set; configure waqi.token or the \
                     WAQI_API_TOKEN environment variable",
                )
            })?;

        let url = format!("{}/feed/{}/", self.config.base_url.trim_end_matches('/'), city);
        debug!(city = %city, "Fetching WAQI feed");

        let response = self
            .http
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await
            .map_err(|e| Error::transport(format!("feed request for {city:?} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "feed request for {city:?} returned HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("failed to read feed body: {e}")))?;

        let feed: FeedResponse = serde_json::from_str(&body)?;

        if !feed.is_ok() {
            info!(city = %city, status = %feed.status, "No data available for city");
            return Ok(FetchOutcome::NoData);
        }

        let values = feed.data.as_ref().map(feed::flatten).unwrap_or_default();

        let row = MeasurementRow::new(city, values);
        debug!(
            city = %row.city,
            pollutants = row.values.len(),
            "Fetched measurement"
        );

        Ok(FetchOutcome::Row(row))
    }
}
