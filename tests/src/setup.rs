//! Common test setup: an in-process stub of the WAQI feed endpoint plus a
//! temporary SQLite store, wired to the real client and dashboard router.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use parking_lot::Mutex;
use tempfile::TempDir;

use aq_store::{MeasurementReader, SqliteStore};
use dashboard::AppState;
use waqi_client::{WaqiClient, WaqiConfig};

use crate::fixtures::feed_error;

type ResponseMap = HashMap<String, (StatusCode, String)>;

#[derive(Clone)]
struct StubState {
    responses: Arc<Mutex<ResponseMap>>,
    calls: Arc<AtomicUsize>,
}

/// In-process stand-in for the remote feed endpoint.
///
/// Serves `GET /feed/{city}/` with per-city canned responses; unknown cities
/// get a "no coverage" body, matching the real feed.
pub struct StubFeed {
    state: StubState,
    pub base_url: String,
}

impl StubFeed {
    pub async fn start() -> Self {
        let state = StubState {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/feed/:city/", get(feed_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub feed");
        let addr = listener.local_addr().expect("Failed to read stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub feed server error");
        });

        Self {
            state,
            base_url: format!("http://{addr}"),
        }
    }

    /// Sets the canned response for one city.
    pub fn set_response(&self, city: &str, status: StatusCode, body: impl Into<String>) {
        self.state
            .responses
            .lock()
            .insert(city.to_string(), (status, body.into()));
    }

    /// Number of feed requests served so far.
    pub fn call_count(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }
}

async fn feed_handler(
    State(state): State<StubState>,
    Path(city): Path<String>,
) -> (StatusCode, String) {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state
        .responses
        .lock()
        .get(&city)
        .cloned()
        .unwrap_or((StatusCode::OK, feed_error()))
}

/// Test context: stub feed, real client, temp SQLite store, dashboard router.
pub struct TestContext {
    // Held so the store directory outlives the test.
    _dir: TempDir,
    pub feed: StubFeed,
    pub client: WaqiClient,
    pub store: Arc<SqliteStore>,
    pub router: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let feed = StubFeed::start().await;
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store =
            Arc::new(SqliteStore::open(dir.path().join("waqi_data.db")).expect("Failed to open store"));

        let client = WaqiClient::new(WaqiConfig {
            base_url: feed.base_url.clone(),
            token: Some("test-token".to_string()),
            timeout_secs: 5,
        })
        .expect("Failed to create client");

        let router = dashboard::router(AppState::new(
            store.clone() as Arc<dyn MeasurementReader>,
        ));

        Self {
            _dir: dir,
            feed,
            client,
            store,
            router,
        }
    }

    /// A client with no token configured, against the same stub.
    pub fn client_without_token(&self) -> WaqiClient {
        WaqiClient::new(WaqiConfig {
            base_url: self.feed.base_url.clone(),
            token: None,
            timeout_secs: 5,
        })
        .expect("Failed to create client")
    }
}
