//! Dashboard Routes
//!
//! Read-only views of the metric cards and chart series.
//!
//! - GET /api/v1/dashboard - Full snapshot
//! - GET /api/v1/metrics - Metric cards
//! - GET /api/v1/charts/:name - One chart series

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dashboard::{ChartKind, DashboardSnapshot};
use crate::data::{ChartPoint, Metric};

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot().await)
}

/// GET /api/v1/metrics
pub async fn list_metrics(State(state): State<Arc<AppState>>) -> Json<Vec<Metric>> {
    Json(state.dashboard.metrics().await)
}

/// GET /api/v1/charts/:name
///
/// `name` is one of revenue, engagement, funnel, traffic.
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<ChartPoint>>> {
    let kind: ChartKind = name.parse()?;
    Ok(Json(state.dashboard.chart(kind).await))
}
