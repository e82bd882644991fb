//! Batch driver: one independent outcome per city.

use axum::http::StatusCode;

use aq_core::CityOutcome;
use aq_store::MeasurementReader;
use integration_tests::fixtures::{feed_error, feed_ok};
use integration_tests::setup::TestContext;
use poller::run_batch;

#[tokio::test]
async fn batch_yields_one_report_per_city_in_order() {
    let ctx = TestContext::new().await;
    ctx.feed
        .set_response("Budapest", StatusCode::OK, feed_ok(&[("pm25", 12.0)]));
    ctx.feed
        .set_response("Vienna", StatusCode::OK, feed_error());
    ctx.feed
        .set_response("Beijing", StatusCode::OK, feed_ok(&[("pm25", 160.0)]));

    let cities: Vec<String> = ["Budapest", "Vienna", "Beijing"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let reports = run_batch(&ctx.client, ctx.store.as_ref(), &cities).await;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].city, "Budapest");
    assert!(reports[0].outcome.is_stored());
    assert_eq!(reports[1].city, "Vienna");
    assert!(matches!(reports[1].outcome, CityOutcome::NoData));
    assert_eq!(reports[2].city, "Beijing");
    assert!(reports[2].outcome.is_stored());
}

#[tokio::test]
async fn one_failing_city_does_not_abort_the_batch() {
    let ctx = TestContext::new().await;
    ctx.feed.set_response(
        "Budapest",
        StatusCode::INTERNAL_SERVER_ERROR,
        "server exploded",
    );
    ctx.feed
        .set_response("Szeged", StatusCode::OK, feed_ok(&[("pm10", 8.0)]));

    let cities: Vec<String> = ["Budapest", "Szeged"].iter().map(|c| c.to_string()).collect();
    let reports = run_batch(&ctx.client, ctx.store.as_ref(), &cities).await;

    assert_eq!(reports.len(), 2);
    assert!(reports[0].outcome.is_failed());
    assert!(reports[1].outcome.is_stored());

    // The failing city aborted nothing; the later city is persisted.
    assert_eq!(ctx.store.cities().unwrap(), vec!["szeged"]);
}

#[tokio::test]
async fn batch_with_no_coverage_persists_nothing() {
    let ctx = TestContext::new().await;

    let cities: Vec<String> = ["Atlantis"].iter().map(|c| c.to_string()).collect();
    let reports = run_batch(&ctx.client, ctx.store.as_ref(), &cities).await;

    assert_eq!(reports.len(), 1);
    assert!(matches!(reports[0].outcome, CityOutcome::NoData));
    assert!(ctx.store.cities().unwrap().is_empty());
}
