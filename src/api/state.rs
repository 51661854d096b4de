//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::dashboard::Dashboard;
use crate::export::Exporter;
use crate::websocket::{ConnectionHub, HubConfig};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Dashboard state owner
    pub dashboard: Arc<Dashboard>,
    /// Export formats and default filenames
    pub exporter: Arc<Exporter>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for real-time streaming
    pub ws_hub: Arc<ConnectionHub>,
}

impl AppState {
    /// Create the state and start forwarding dashboard changes to
    /// WebSocket clients
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(dashboard: Arc<Dashboard>, exporter: Exporter, config: ApiConfig) -> Self {
        let ws_hub = Arc::new(ConnectionHub::new(HubConfig {
            max_connections: config.max_ws_connections,
        }));
        let _ = ws_hub.spawn_bridge(&dashboard);

        Self {
            dashboard,
            exporter: Arc::new(exporter),
            config: Arc::new(config),
            start_time: Instant::now(),
            ws_hub,
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}
