//! City batch driver.
//!
//! Each city is fetched and persisted independently, in request order. A
//! failure for one city is recorded in its report entry and the batch
//! continues; nothing aborts the remaining cities.

use tracing::{info, warn};

use aq_core::{CityOutcome, CityReport, FetchOutcome};
use aq_store::MeasurementStore;
use waqi_client::WaqiClient;

/// Fetches and persists one batch of cities, one report entry per city.
pub async fn run_batch(
    client: &WaqiClient,
    store: &dyn MeasurementStore,
    cities: &[String],
) -> Vec<CityReport> {
    let mut reports = Vec::with_capacity(cities.len());

    for city in cities {
        let outcome = fetch_and_store(client, store, city).await;
        match &outcome {
            CityOutcome::Stored { row, id } => {
                info!(city = %row.city, id, pollutants = row.values.len(), "Stored measurement");
            }
            CityOutcome::NoData => {
                info!(city = %city, "No data found for city");
            }
            CityOutcome::Failed(e) => {
                warn!(city = %city, error = %e, "City fetch failed");
            }
        }
        reports.push(CityReport {
            city: city.clone(),
            outcome,
        });
    }

    reports
}

/// Fetches one city and persists the row if the feed returned one.
async fn fetch_and_store(
    client: &WaqiClient,
    store: &dyn MeasurementStore,
    city: &str,
) -> CityOutcome {
    match client.fetch_city(city).await {
        Ok(FetchOutcome::Row(row)) => match store.append(&row) {
            Ok(id) => CityOutcome::Stored { row, id },
            Err(e) => CityOutcome::Failed(e),
        },
        Ok(FetchOutcome::NoData) => CityOutcome::NoData,
        Err(e) => CityOutcome::Failed(e),
    }
}
