//! Export Routes
//!
//! Campaign data download.
//!
//! - GET /api/v1/export/:format - Export all campaigns as csv, json or pdf

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::dto::ExportParams;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::export::ExportFormat;

/// GET /api/v1/export/:format
///
/// Exports the full campaign list in its original order, ignoring the
/// table's sort and page. PDF is not rendered and answers 501 with a
/// notice.
pub async fn export_campaigns(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let format: ExportFormat = format.parse()?;
    let artifact = state.exporter.export(
        format,
        state.dashboard.campaigns(),
        params.filename.as_deref(),
    )?;

    tracing::info!(
        format = %format,
        filename = %artifact.filename,
        "Campaign export served"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        Body::from(artifact.body),
    )
        .into_response())
}
