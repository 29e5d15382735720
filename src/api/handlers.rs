//! Request handlers for the dashboard endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::types::{DateRangeQuery, ErrorResponse};
use super::AppState;
use crate::kpi::KpiReport;
use crate::report::{DailyEnergy, MonthlyProfile, WindBreakdown, YearlyCapacity};

/// `GET /kpis` → 200 + [`KpiReport`] JSON
pub async fn get_kpis(State(state): State<Arc<AppState>>) -> Json<KpiReport> {
    Json(state.kpi.clone())
}

/// `GET /series/daily` → 200 + `Vec<DailyEnergy>` JSON
/// `GET /series/daily?from=2019-01-01&to=2019-06-30` → filtered range (inclusive)
/// `GET /series/daily?from=2019-06-30&to=2019-01-01` → 400 + [`ErrorResponse`]
pub async fn get_daily(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateRangeQuery>,
) -> impl IntoResponse {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("`from` ({from}) must be <= `to` ({to})"),
                }),
            ));
        }
    }

    let days: Vec<DailyEnergy> = state
        .daily
        .iter()
        .filter(|d| query.from.is_none_or(|from| d.date >= from))
        .filter(|d| query.to.is_none_or(|to| d.date <= to))
        .cloned()
        .collect();

    Ok(Json(days))
}

/// `GET /series/monthly` → 200 + `Vec<MonthlyProfile>` JSON
pub async fn get_monthly(State(state): State<Arc<AppState>>) -> Json<Vec<MonthlyProfile>> {
    Json(state.monthly.clone())
}

/// `GET /series/wind` → 200 + `Vec<WindBreakdown>` JSON
pub async fn get_wind(State(state): State<Arc<AppState>>) -> Json<Vec<WindBreakdown>> {
    Json(state.wind.clone())
}

/// `GET /capacity` → 200 + `Vec<YearlyCapacity>` JSON
pub async fn get_capacity(State(state): State<Arc<AppState>>) -> Json<Vec<YearlyCapacity>> {
    Json(state.capacity.clone())
}

/// `GET /forecast` → 200 + `Vec<ForecastPoint>` JSON, or 404 when no model
/// was trained or loaded for this run.
pub async fn get_forecast(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.forecast {
        Some(points) => Ok(Json(points.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "no forecast available; run with --train or --model-in".to_string(),
            }),
        )),
    }
}
