//! Dashboard router over a real store.

use axum::http::StatusCode;
use axum_test::TestServer;

use aq_store::MeasurementStore;
use integration_tests::fixtures::feed_ok;
use integration_tests::setup::TestContext;

async fn ingest(ctx: &TestContext, city: &str, body: String) {
    ctx.feed.set_response(city, StatusCode::OK, body);
    match ctx.client.fetch_city(city).await.unwrap() {
        aq_core::FetchOutcome::Row(row) => {
            ctx.store.append(&row).unwrap();
        }
        aq_core::FetchOutcome::NoData => panic!("expected data for {city}"),
    }
}

#[tokio::test]
async fn empty_store_shows_instructional_warning() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(
        body.contains("No data found"),
        "expected warning, got: {body}"
    );
}

#[tokio::test]
async fn index_lists_stored_cities_capitalized() {
    let ctx = TestContext::new().await;
    ingest(&ctx, "budapest", feed_ok(&[("pm25", 12.0)])).await;

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Budapest"), "got: {body}");
    assert!(body.contains("/city/budapest"), "got: {body}");
}

#[tokio::test]
async fn city_page_shows_preview_and_banded_chart() {
    let ctx = TestContext::new().await;
    ingest(
        &ctx,
        "Beijing",
        feed_ok(&[("pm25", 160.0), ("pm10", 42.0), ("dew", 7.0)]),
    )
    .await;

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let response = server.get("/city/beijing").await;
    response.assert_status_ok();
    let body = response.text();

    // Preview table
    assert!(body.contains("<table>"), "got: {body}");
    assert!(body.contains("pm25"));
    assert!(body.contains("160"));

    // Bar colors by band: >=100 red, [25,50) yellow, <25 green
    assert!(body.contains("#f44336"), "severe band missing: {body}");
    assert!(body.contains("#ffeb3b"), "moderate band missing: {body}");
    assert!(body.contains("#4caf50"), "low band missing: {body}");
}

#[tokio::test]
async fn unknown_city_shows_warning_not_error() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/city/nowhere").await;
    response.assert_status_ok();
    assert!(response.text().contains("No data found"));
}

#[tokio::test]
async fn health_reports_city_count() {
    let ctx = TestContext::new().await;
    ingest(&ctx, "Gyor", feed_ok(&[("pm25", 3.0)])).await;

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cities"], 1);
}
