//! Live Update Routes
//!
//! - GET /api/v1/live - Current live status
//! - PUT /api/v1/live - Switch live updates on or off
//! - POST /api/v1/live/toggle - Flip live updates

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{LiveResponse, SetLiveRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1/live
pub async fn get_live(State(state): State<Arc<AppState>>) -> Json<LiveResponse> {
    Json(live_status(&state).await)
}

/// PUT /api/v1/live
///
/// Idempotent: requesting the current state changes nothing.
pub async fn set_live(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetLiveRequest>, JsonRejection>,
) -> ApiResult<Json<LiveResponse>> {
    let Json(req) = payload?;
    state.dashboard.set_live(req.enabled).await;
    Ok(Json(live_status(&state).await))
}

/// POST /api/v1/live/toggle
pub async fn toggle_live(State(state): State<Arc<AppState>>) -> Json<LiveResponse> {
    state.dashboard.toggle_live().await;
    Json(live_status(&state).await)
}

async fn live_status(state: &AppState) -> LiveResponse {
    let dashboard = &state.dashboard;
    LiveResponse {
        enabled: dashboard.is_live().await,
        interval_ms: dashboard.tick_interval().await.as_millis() as u64,
        last_update: dashboard.last_update().await,
    }
}
