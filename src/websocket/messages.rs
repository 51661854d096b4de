//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! dashboard clients and the Insights server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::dashboard::{DashboardEvent, DashboardSnapshot, NotificationSummary, Theme};
use crate::data::{ChartPoint, Metric};
use crate::table::{PageView, TableViewState};

use super::hub::HubError;

/// Streams a connection can subscribe to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Metrics,
    Live,
    Table,
    Theme,
    Notifications,
}

impl Topic {
    pub fn all() -> &'static [Topic] {
        &[
            Topic::Metrics,
            Topic::Live,
            Topic::Table,
            Topic::Theme,
            Topic::Notifications,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Metrics => "metrics",
            Topic::Live => "live",
            Topic::Table => "table",
            Topic::Theme => "theme",
            Topic::Notifications => "notifications",
        }
    }
}

impl FromStr for Topic {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| HubError::UnknownTopic(s.to_string()))
    }
}

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics
    Subscribe { topics: Vec<String> },
    /// Unsubscribe from topics
    Unsubscribe { topics: Vec<String> },
    /// Ping for keepalive
    Ping,
    /// Switch live updates on or off
    SetLive { enabled: bool },
    /// Click a campaign table header
    Sort { field: String },
    /// Navigate the campaign table
    Page { page: usize },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected { connection_id: String },
    /// Full state, sent once after `connected`
    Snapshot {
        dashboard: DashboardSnapshot,
        table: TableViewState,
        page: PageView,
        theme: Theme,
        notifications: NotificationSummary,
    },
    /// A live tick replaced the metric cards and the revenue series
    MetricsUpdated {
        metrics: Vec<Metric>,
        revenue: Vec<ChartPoint>,
        at: DateTime<Utc>,
    },
    /// Live updates switched on or off
    LiveChanged { enabled: bool },
    /// Campaign sort or page changed
    TableChanged {
        state: TableViewState,
        page: PageView,
    },
    /// Theme preference changed
    ThemeChanged { theme: Theme },
    /// Notification list changed
    NotificationsChanged {
        #[serde(flatten)]
        summary: NotificationSummary,
    },
    /// Subscription confirmed
    Subscribed { topics: Vec<Topic> },
    /// Unsubscription confirmed
    Unsubscribed { topics: Vec<Topic> },
    /// Pong response to ping
    Pong,
    /// Error message
    Error { message: String },
}

/// Internal event for broadcasting through the hub
#[derive(Debug, Clone)]
pub struct WsEvent {
    /// Topic this event belongs to
    pub topic: Topic,
    /// The message to send to subscribers
    pub message: ServerMessage,
}

impl WsEvent {
    pub fn theme(theme: Theme) -> Self {
        Self {
            topic: Topic::Theme,
            message: ServerMessage::ThemeChanged { theme },
        }
    }

    pub fn notifications(summary: NotificationSummary) -> Self {
        Self {
            topic: Topic::Notifications,
            message: ServerMessage::NotificationsChanged { summary },
        }
    }
}

impl From<DashboardEvent> for WsEvent {
    fn from(event: DashboardEvent) -> Self {
        match event {
            DashboardEvent::Updated {
                metrics,
                revenue,
                at,
            } => Self {
                topic: Topic::Metrics,
                message: ServerMessage::MetricsUpdated {
                    metrics,
                    revenue,
                    at,
                },
            },
            DashboardEvent::LiveChanged { enabled } => Self {
                topic: Topic::Live,
                message: ServerMessage::LiveChanged { enabled },
            },
            DashboardEvent::TableChanged { state, page } => Self {
                topic: Topic::Table,
                message: ServerMessage::TableChanged { state, page },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["metrics", "theme"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => {
                assert_eq!(topics, vec!["metrics", "theme"]);
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_commands() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "set_live", "enabled": true}"#).unwrap();
        assert!(matches!(msg, ClientMessage::SetLive { enabled: true }));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "sort", "field": "ctr"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Sort { field } if field == "ctr"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type": "page", "page": 2}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Page { page: 2 }));
    }

    #[test]
    fn test_client_message_rejects_unknown_type() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "reboot"}"#).is_err());
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"connection_id\":\"abc-123\""));
    }

    #[test]
    fn test_server_message_serialize_notifications() {
        let msg = ServerMessage::NotificationsChanged {
            summary: NotificationSummary {
                total: 4,
                unread: 1,
            },
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "notifications_changed");
        assert_eq!(value["total"], 4);
        assert_eq!(value["unread"], 1);
    }

    #[test]
    fn test_dashboard_event_topics() {
        let event = WsEvent::from(DashboardEvent::LiveChanged { enabled: true });
        assert_eq!(event.topic, Topic::Live);
        assert!(matches!(event.message, ServerMessage::LiveChanged { enabled: true }));

        assert_eq!(WsEvent::theme(Theme::Dark).topic, Topic::Theme);
    }

    #[test]
    fn test_parse_topic() {
        assert_eq!("table".parse::<Topic>().unwrap(), Topic::Table);
        assert!(matches!(
            "metrics.*".parse::<Topic>(),
            Err(HubError::UnknownTopic(_))
        ));
    }
}
