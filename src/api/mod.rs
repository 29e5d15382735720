//! JSON dashboard API over the computed analysis products.
//!
//! Endpoints:
//! - `/kpis` — KPI panel values
//! - `/series/daily` — daily energy mix, optional date range filtering
//! - `/series/monthly` — seasonal profile
//! - `/series/wind` — yearly onshore/offshore breakdown
//! - `/capacity` — yearly capacity growth
//! - `/forecast` — model predictions, 404 when no model ran

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::kpi::KpiReport;
use crate::report::{DailyEnergy, ForecastPoint, MonthlyProfile, WindBreakdown, YearlyCapacity};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the analysis completes and wrapped in `Arc` — no
/// locks needed since all data is read-only.
pub struct AppState {
    pub kpi: KpiReport,
    pub daily: Vec<DailyEnergy>,
    pub monthly: Vec<MonthlyProfile>,
    pub capacity: Vec<YearlyCapacity>,
    pub wind: Vec<WindBreakdown>,
    /// Present only when a model was trained or loaded.
    pub forecast: Option<Vec<ForecastPoint>>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/kpis", get(handlers::get_kpis))
        .route("/series/daily", get(handlers::get_daily))
        .route("/series/monthly", get(handlers::get_monthly))
        .route("/series/wind", get(handlers::get_wind))
        .route("/capacity", get(handlers::get_capacity))
        .route("/forecast", get(handlers::get_forecast))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("Dashboard API listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
