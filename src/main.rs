//! airwatch - air-quality ingestion pipeline and dashboard.
//!
//! Periodically fetches WAQI measurements for the configured cities, appends
//! them to a schema-evolving local store, and serves a read-only HTML
//! dashboard over the stored rows.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use aq_store::{open_store, StoreBackend, StoreConfig};
use dashboard::{router, AppState};
use poller::{Poller, PollerConfig};
use telemetry::init_tracing_from_env;
use waqi_client::{WaqiClient, WaqiConfig};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Cities fetched each poll cycle, in order.
    #[serde(default = "default_cities")]
    cities: Vec<String>,

    /// Seconds between poll cycles.
    #[serde(default = "default_poll_interval_secs")]
    poll_interval_secs: u64,

    /// Run a single batch and exit instead of serving the dashboard.
    #[serde(default)]
    run_once: bool,

    #[serde(default)]
    waqi: WaqiConfig,

    #[serde(default)]
    store: StoreConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cities() -> Vec<String> {
    ["Budapest", "Debrecen", "Szeged", "Gyor", "Pecs"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_poll_interval_secs() -> u64 {
    3600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cities: default_cities(),
            poll_interval_secs: default_poll_interval_secs(),
            run_once: false,
            waqi: WaqiConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting airwatch v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    let store = open_store(&config.store).context("Failed to open measurement store")?;
    let client = Arc::new(WaqiClient::new(config.waqi.clone()).context("Failed to create WAQI client")?);

    let poller = Arc::new(Poller::new(
        PollerConfig {
            cities: config.cities.clone(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
        },
        client,
        store.clone(),
    ));

    if config.run_once {
        poller.run_once().await;
        return Ok(());
    }

    let _poll_handle = poller.start();

    // Dashboard has read-only access to the store.
    let state = AppState::new(store);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Dashboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("AIRWATCH")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested fields; the config crate's nested parsing
    // doesn't work reliably with underscored field names.
    if let Ok(token) = std::env::var("AIRWATCH_WAQI_TOKEN") {
        config.waqi.token = Some(token);
    }
    // Legacy token variable, kept for existing deployments.
    if config.waqi.token.is_none() {
        if let Ok(token) = std::env::var("WAQI_API_TOKEN") {
            config.waqi.token = Some(token);
        }
    }
    if let Ok(base_url) = std::env::var("AIRWATCH_WAQI_BASE_URL") {
        config.waqi.base_url = base_url;
    }
    if let Ok(path) = std::env::var("AIRWATCH_STORE_PATH") {
        config.store.path = path.into();
    }
    if let Ok(backend) = std::env::var("AIRWATCH_STORE_BACKEND") {
        config.store.backend = match backend.as_str() {
            "csv" => StoreBackend::Csv,
            _ => StoreBackend::Sqlite,
        };
    }
    if let Ok(cities) = std::env::var("AIRWATCH_CITIES") {
        config.cities = cities.split(',').map(|s| s.trim().to_string()).collect();
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
