//! Theme Routes
//!
//! - GET /api/v1/theme - Current theme
//! - PUT /api/v1/theme - Change the theme

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{ThemeRequest, ThemeResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::Theme;

/// GET /api/v1/theme
pub async fn get_theme(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    Json(state.dashboard.theme().get().await.into())
}

/// PUT /api/v1/theme
pub async fn set_theme(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ThemeRequest>, JsonRejection>,
) -> ApiResult<Json<ThemeResponse>> {
    let Json(req) = payload?;
    let theme: Theme = req
        .theme
        .parse()
        .map_err(|e: crate::dashboard::ParseThemeError| ApiError::Validation(e.to_string()))?;

    state.dashboard.theme().set(theme).await;
    Ok(Json(theme.into()))
}
