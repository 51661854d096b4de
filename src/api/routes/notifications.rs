//! Notification Routes
//!
//! - GET /api/v1/notifications - List with unread badge
//! - POST /api/v1/notifications/:id/read - Mark one read
//! - POST /api/v1/notifications/read-all - Mark all read
//! - DELETE /api/v1/notifications - Clear the list

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{NotificationsChangedResponse, NotificationsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
) -> Json<NotificationsResponse> {
    let center = state.dashboard.notifications();
    let notifications = center.list().await;
    let summary = center.summary().await;

    Json(NotificationsResponse {
        notifications,
        badge: crate::dashboard::badge_label(summary.unread),
        summary,
    })
}

/// POST /api/v1/notifications/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<NotificationsChangedResponse>> {
    let center = state.dashboard.notifications();
    let was_unread = center
        .list()
        .await
        .iter()
        .any(|n| n.id == id && !n.read);

    if !center.mark_read(&id).await {
        return Err(ApiError::NotFound(format!(
            "Notification with id {} not found",
            id
        )));
    }

    Ok(Json(NotificationsChangedResponse {
        affected: usize::from(was_unread),
        summary: center.summary().await,
    }))
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
) -> Json<NotificationsChangedResponse> {
    let center = state.dashboard.notifications();
    let affected = center.mark_all_read().await;

    Json(NotificationsChangedResponse {
        affected,
        summary: center.summary().await,
    })
}

/// DELETE /api/v1/notifications
pub async fn clear_notifications(
    State(state): State<Arc<AppState>>,
) -> Json<NotificationsChangedResponse> {
    let center = state.dashboard.notifications();
    let affected = center.clear().await;

    tracing::info!(removed = affected, "Notifications cleared");
    Json(NotificationsChangedResponse {
        affected,
        summary: center.summary().await,
    })
}
