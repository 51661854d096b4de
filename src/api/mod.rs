//! Insights REST API
//!
//! HTTP API layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/dashboard` - Full snapshot
//! - `GET /api/v1/metrics` - Metric cards
//! - `GET /api/v1/charts/:name` - Chart series (revenue, engagement, funnel, traffic)
//!
//! ## Live Updates
//! - `GET /api/v1/live` - Live status
//! - `PUT /api/v1/live` - Switch on or off
//! - `POST /api/v1/live/toggle` - Flip
//!
//! ## Campaigns
//! - `GET /api/v1/campaigns` - Current page and sort state
//! - `POST /api/v1/campaigns/sort` - Click a sort header
//! - `PUT /api/v1/campaigns/page` - Navigate
//!
//! ## Export
//! - `GET /api/v1/export/:format` - Download campaigns as csv, json (pdf answers 501)
//!
//! ## Theme
//! - `GET /api/v1/theme`, `PUT /api/v1/theme`
//!
//! ## Notifications
//! - `GET /api/v1/notifications` - List with unread badge
//! - `POST /api/v1/notifications/:id/read` - Mark one read
//! - `POST /api/v1/notifications/read-all` - Mark all read
//! - `DELETE /api/v1/notifications` - Clear
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /ws` - Real-time streaming connection
//!
//! # Example
//!
//! ```rust,no_run
//! use insights::api::{serve, AppState};
//! use insights::config::Config;
//! use insights::dashboard::Dashboard;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let dashboard = Arc::new(Dashboard::new(config.dashboard_settings()));
//!
//!     let state = AppState::new(dashboard, (&config.export).into(), config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use crate::config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Dashboard routes
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/metrics", get(routes::dashboard::list_metrics))
        .route("/charts/:name", get(routes::dashboard::get_chart))
        // Live update routes
        .route(
            "/live",
            get(routes::live::get_live).put(routes::live::set_live),
        )
        .route("/live/toggle", post(routes::live::toggle_live))
        // Campaign table routes
        .route("/campaigns", get(routes::campaigns::get_campaigns))
        .route("/campaigns/sort", post(routes::campaigns::sort_campaigns))
        .route("/campaigns/page", put(routes::campaigns::go_to_page))
        // Export routes
        .route("/export/:format", get(routes::export::export_campaigns))
        // Theme routes
        .route(
            "/theme",
            get(routes::theme::get_theme).put(routes::theme::set_theme),
        )
        // Notification routes
        .route(
            "/notifications",
            get(routes::notifications::list_notifications)
                .delete(routes::notifications::clear_notifications),
        )
        .route(
            "/notifications/read-all",
            post(routes::notifications::mark_all_read),
        )
        .route(
            "/notifications/:id/read",
            post(routes::notifications::mark_read),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_secs.max(1),
        )));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the configured origins; any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let dashboard = Arc::clone(&state.dashboard);
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Insights API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    dashboard.shutdown().await;
    tracing::info!("Insights API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
