//! Campaign Table Routes
//!
//! - GET /api/v1/campaigns - Current page and sort state
//! - POST /api/v1/campaigns/sort - Click a sort header
//! - PUT /api/v1/campaigns/page - Navigate to a page

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{CampaignsResponse, PageRequest, SortRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::table::{PageView, SortField};

/// GET /api/v1/campaigns
pub async fn get_campaigns(State(state): State<Arc<AppState>>) -> Json<CampaignsResponse> {
    let page = state.dashboard.campaigns_page().await;
    Json(respond(&state, page).await)
}

/// POST /api/v1/campaigns/sort
///
/// A new field starts descending; the same field flips direction. The
/// current page is kept.
pub async fn sort_campaigns(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SortRequest>, JsonRejection>,
) -> ApiResult<Json<CampaignsResponse>> {
    let Json(req) = payload?;
    let field: SortField = req
        .field
        .parse()
        .map_err(|e: crate::table::ParseSortFieldError| ApiError::Validation(e.to_string()))?;

    let page = state.dashboard.sort_campaigns(field).await;
    Ok(Json(respond(&state, page).await))
}

/// PUT /api/v1/campaigns/page
pub async fn go_to_page(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PageRequest>, JsonRejection>,
) -> ApiResult<Json<CampaignsResponse>> {
    let Json(req) = payload?;
    let page = state.dashboard.go_to_page(req.page).await?;
    Ok(Json(respond(&state, page).await))
}

async fn respond(state: &AppState, page: PageView) -> CampaignsResponse {
    CampaignsResponse {
        state: state.dashboard.table_state().await,
        page,
    }
}
