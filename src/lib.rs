//! # Insights
//!
//! Marketing analytics dashboard server - metric cards, chart series and a
//! campaign table, kept fresh by a simulated live feed and served over
//! REST and WebSocket.
//!
//! ## Features
//!
//! - **Live simulation**: Periodic jitter of metric cards and a sliding revenue window
//! - **Campaign table**: Stable multi-column sort with pagination
//! - **Export**: CSV and JSON downloads of the campaign data
//! - **Real-time**: WebSocket push of every dashboard change
//!
//! ## Modules
//!
//! - [`data`]: Records and seed data
//! - [`simulator`]: Metric perturbation and the live ticker
//! - [`table`]: Campaign table view model
//! - [`export`]: Export formats
//! - [`dashboard`]: Dashboard state owner, theme and notifications
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Real-time streaming
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use insights::dashboard::{Dashboard, DashboardSettings};
//! use insights::table::SortField;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let dashboard = Arc::new(Dashboard::new(DashboardSettings::default()));
//!
//!     // Start the 5 second live feed
//!     dashboard.set_live(true).await;
//!
//!     // Click the "Clicks" header and read the first page
//!     let page = dashboard.sort_campaigns(SortField::Clicks).await;
//!     println!(
//!         "Showing {} to {} of {} campaigns",
//!         page.first_index, page.last_index, page.total_records
//!     );
//!
//!     dashboard.shutdown().await;
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod icons;
pub mod simulator;
pub mod table;
pub mod websocket;

// Re-export top-level types for convenience
pub use data::{CampaignRecord, CampaignStatus, ChartPoint, Metric, Trend};

pub use icons::IconKey;

pub use simulator::{LiveTicker, MetricSimulator, Tick, UnitMarker};

pub use table::{PageView, SortDirection, SortField, TableViewState};

pub use export::{Artifact, ExportError, ExportFormat, Exporter};

pub use dashboard::{
    Dashboard, DashboardError, DashboardEvent, DashboardSettings, DashboardSnapshot, Theme,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{
    websocket_handler, ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, Topic,
    WsEvent,
};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig};
