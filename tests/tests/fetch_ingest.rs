//! Fetcher behavior against the stub feed.

use axum::http::StatusCode;

use aq_core::{Error, FetchOutcome};
use aq_store::MeasurementReader;
use integration_tests::fixtures::{feed_error, feed_ok};
use integration_tests::setup::TestContext;

#[tokio::test]
async fn successful_fetch_flattens_pollutant_values() {
    let ctx = TestContext::new().await;
    ctx.feed.set_response(
        "Budapest",
        StatusCode::OK,
        feed_ok(&[("pm25", 10.0), ("pm10", 20.0)]),
    );

    let outcome = ctx.client.fetch_city("Budapest").await.unwrap();
    let row = outcome.row().expect("expected a measurement row");

    assert_eq!(row.city, "budapest");
    assert_eq!(row.values["pm25"], Some(10.0));
    assert_eq!(row.values["pm10"], Some(20.0));
}

#[tokio::test]
async fn non_ok_status_yields_no_data_and_persists_nothing() {
    let ctx = TestContext::new().await;
    ctx.feed
        .set_response("Nowhere", StatusCode::OK, feed_error());

    let outcome = ctx.client.fetch_city("Nowhere").await.unwrap();
    assert_eq!(outcome, FetchOutcome::NoData);
    assert!(ctx.store.cities().unwrap().is_empty());
}

#[tokio::test]
async fn missing_token_fails_without_any_network_call() {
    let ctx = TestContext::new().await;
    let client = ctx.client_without_token();

    let err = client.fetch_city("Budapest").await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(ctx.feed.call_count(), 0, "no request should have been made");
}

#[tokio::test]
async fn http_failure_is_a_transport_error() {
    let ctx = TestContext::new().await;
    ctx.feed.set_response(
        "Budapest",
        StatusCode::INTERNAL_SERVER_ERROR,
        "server exploded",
    );

    let err = ctx.client.fetch_city("Budapest").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let ctx = TestContext::new().await;
    ctx.feed
        .set_response("Budapest", StatusCode::OK, "not json at all");

    let err = ctx.client.fetch_city("Budapest").await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "got {err:?}");
}
