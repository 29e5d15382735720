//! Dashboard API integration tests over the full data pipeline.
#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use gridscope::api::{router, AppState};
use gridscope::dataset;
use gridscope::kpi::KpiReport;
use gridscope::report::{self, ForecastPoint};
use tower::util::ServiceExt;

fn make_state(forecast: Option<Vec<ForecastPoint>>) -> Arc<AppState> {
    let (_dir, path) = common::synthetic_csv(500, 11);
    let table = dataset::load_csv(&path).expect("load");
    Arc::new(AppState {
        kpi: KpiReport::from_table(&table),
        daily: report::daily_energy(&table),
        monthly: report::monthly_profile(&table),
        capacity: report::yearly_capacity(&table),
        wind: report::wind_breakdown(&table),
        forecast,
    })
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(state);
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn kpis_reflect_loaded_dataset() {
    let (status, json) = get(make_state(None), "/kpis").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["renewable_share_pct"].as_f64().is_some());
    assert!(json["load_forecast_accuracy_pct"].as_f64().is_some());
    // synthetic layout has no offshore capacity column
    assert!(json["offshore_wind_share_pct"].is_null());
}

#[tokio::test]
async fn daily_series_has_one_entry_per_day() {
    let state = make_state(None);
    let expected = state.daily.len();
    let (status, json) = get(state, "/series/daily").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(expected));
}

#[tokio::test]
async fn daily_inverted_range_is_rejected() {
    let (status, json) =
        get(make_state(None), "/series/daily?from=2019-01-05&to=2019-01-02").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn daily_range_filters_by_date() {
    let (status, json) =
        get(make_state(None), "/series/daily?from=2019-01-02&to=2019-01-03").await;
    assert_eq!(status, StatusCode::OK);
    let days = json.as_array().expect("array");
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2019-01-02");
}

#[tokio::test]
async fn forecast_is_404_until_model_runs() {
    let (status, json) = get(make_state(None), "/forecast").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn forecast_serves_points_when_present() {
    let points = vec![ForecastPoint {
        timestamp: Utc.with_ymd_and_hms(2019, 1, 1, 4, 0, 0).unwrap(),
        actual_mw: 21000.0,
        predicted_mw: 20500.0,
    }];
    let (status, json) = get(make_state(Some(points)), "/forecast").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json.as_array().expect("array");
    assert_eq!(arr.len(), 1);
    assert!(arr[0]["actual_mw"].as_f64().is_some());
}

#[tokio::test]
async fn capacity_and_wind_endpoints_serve_yearly_rows() {
    let (status, json) = get(make_state(None), "/capacity").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["year"], 2019);

    let (status, json) = get(make_state(None), "/series/wind").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().expect("array");
    assert_eq!(rows[0]["year"], 2019);
    assert!(rows[0]["onshore_mw"].as_f64().is_some());
}
