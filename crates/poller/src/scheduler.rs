//! Periodic fetch scheduler.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info};

use aq_store::MeasurementStore;
use waqi_client::WaqiClient;

use crate::batch::run_batch;

/// Poller configuration.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Cities to fetch each cycle, in order.
    pub cities: Vec<String>,
    /// Time between batch runs.
    pub poll_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            cities: ["Budapest", "Debrecen", "Szeged", "Gyor", "Pecs"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            poll_interval: Duration::from_secs(3600), // 1 hour
        }
    }
}

/// Periodically runs the city batch against the store.
pub struct Poller {
    config: PollerConfig,
    client: Arc<WaqiClient>,
    store: Arc<dyn MeasurementStore>,
}

impl Poller {
    pub fn new(
        config: PollerConfig,
        client: Arc<WaqiClient>,
        store: Arc<dyn MeasurementStore>,
    ) -> Self {
        Self {
            config,
            client,
            store,
        }
    }

    /// Runs a single batch and logs a summary.
    pub async fn run_once(&self) {
        if self.config.cities.is_empty() {
            error!("No cities configured; nothing to fetch");
            return;
        }

        let reports = run_batch(&self.client, self.store.as_ref(), &self.config.cities).await;

        let stored = reports.iter().filter(|r| r.outcome.is_stored()).count();
        let failed = reports.iter().filter(|r| r.outcome.is_failed()).count();
        info!(
            cities = reports.len(),
            stored,
            failed,
            no_data = reports.len() - stored - failed,
            "Batch complete"
        );
    }

    /// Starts the poll loop. The first batch runs immediately.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.config.poll_interval);
            info!(
                interval_secs = self.config.poll_interval.as_secs(),
                cities = self.config.cities.len(),
                "Poller started"
            );

            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }
}
