//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dashboard::{Appearance, Notification, NotificationSummary, Theme};
use crate::table::{PageView, TableViewState};

// ============================================
// LIVE UPDATE DTOs
// ============================================

/// Switch live updates on or off
#[derive(Debug, Deserialize)]
pub struct SetLiveRequest {
    pub enabled: bool,
}

/// Live update status
#[derive(Debug, Serialize, Deserialize)]
pub struct LiveResponse {
    /// Whether live updates are running
    pub enabled: bool,
    /// Period between updates in milliseconds
    pub interval_ms: u64,
    /// Time of the last applied update
    pub last_update: Option<DateTime<Utc>>,
}

// ============================================
// CAMPAIGN TABLE DTOs
// ============================================

/// Click a sort header
#[derive(Debug, Deserialize)]
pub struct SortRequest {
    /// Column name: campaign, impressions, clicks, ctr, conversions, revenue, status
    pub field: String,
}

/// Navigate to a page
#[derive(Debug, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: usize,
}

/// Current table state plus the visible page
#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignsResponse {
    pub state: TableViewState,
    #[serde(flatten)]
    pub page: PageView,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    /// Download filename, defaults per format
    #[serde(default)]
    pub filename: Option<String>,
}

// ============================================
// THEME DTOs
// ============================================

/// Change the theme
#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    /// light, dark or system
    pub theme: String,
}

/// Current theme
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    /// Appearance when the OS prefers light
    pub light_preference: Appearance,
    /// Appearance when the OS prefers dark
    pub dark_preference: Appearance,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self {
            theme,
            light_preference: theme.resolve(false),
            dark_preference: theme.resolve(true),
        }
    }
}

// ============================================
// NOTIFICATION DTOs
// ============================================

/// Notification list with badge
#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    #[serde(flatten)]
    pub summary: NotificationSummary,
    /// Badge text, absent when nothing is unread
    pub badge: Option<String>,
}

/// Result of a bulk notification change
#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationsChangedResponse {
    /// Number of notifications affected
    pub affected: usize,
    #[serde(flatten)]
    pub summary: NotificationSummary,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy
    pub status: String,
    /// Whether live updates are running
    pub live: bool,
    /// Number of campaign records served
    pub campaigns: usize,
    /// Open WebSocket connections
    pub ws_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
