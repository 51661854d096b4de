//! WebSocket Connection Hub
//!
//! Tracks active connections and their topic subscriptions, and fans
//! dashboard changes out to them.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::messages::{ServerMessage, Topic, WsEvent};
use crate::dashboard::Dashboard;

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    /// Channel sender for this connection
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    /// Topics this connection receives
    pub topics: HashSet<Topic>,
}

/// Manages all WebSocket connections and subscriptions
pub struct ConnectionHub {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    config: HubConfig,
}

impl ConnectionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Register a new WebSocket connection, subscribed to every topic
    ///
    /// Returns the connection ID on success, or an error if the connection
    /// limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections {
                limit: self.config.max_connections,
            });
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                topics: Topic::all().iter().copied().collect(),
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    pub async fn unregister(&self, id: &str) {
        if self.connections.write().await.remove(id).is_some() {
            tracing::info!(connection_id = %id, "WebSocket disconnected");
        }
    }

    /// Subscribe a connection to topics
    ///
    /// Unknown topic names reject the whole request.
    pub async fn subscribe(&self, id: &str, topics: &[String]) -> Result<Vec<Topic>, HubError> {
        let topics = parse_topics(topics)?;

        let mut connections = self.connections.write().await;
        let handle = connections
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;
        handle.topics.extend(topics.iter().copied());

        tracing::debug!(connection_id = %id, topics = ?topics, "Subscribed to topics");
        Ok(topics)
    }

    /// Unsubscribe a connection from topics
    pub async fn unsubscribe(&self, id: &str, topics: &[String]) -> Result<Vec<Topic>, HubError> {
        let topics = parse_topics(topics)?;

        let mut connections = self.connections.write().await;
        let handle = connections
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        let removed: Vec<Topic> = topics
            .into_iter()
            .filter(|t| handle.topics.remove(t))
            .collect();

        tracing::debug!(connection_id = %id, topics = ?removed, "Unsubscribed from topics");
        Ok(removed)
    }

    /// Send an event to every connection subscribed to its topic
    ///
    /// Returns the number of connections it was queued for.
    pub async fn broadcast(&self, event: &WsEvent) -> usize {
        let connections = self.connections.read().await;

        let mut sent_count = 0;
        for handle in connections.values() {
            if handle.topics.contains(&event.topic)
                && handle.sender.send(event.message.clone()).is_ok()
            {
                sent_count += 1;
            }
        }

        if sent_count > 0 {
            tracing::trace!(
                topic = event.topic.as_str(),
                subscribers = sent_count,
                "Broadcast event"
            );
        }
        sent_count
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.connections.read().await;
        let handle = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        handle
            .sender
            .send(message)
            .map_err(|_| HubError::SendFailed)
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Number of connections receiving a topic
    pub async fn subscription_count(&self, topic: Topic) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|h| h.topics.contains(&topic))
            .count()
    }

    pub fn max_connections(&self) -> usize {
        self.config.max_connections
    }

    /// Forward dashboard, theme and notification changes to subscribers
    ///
    /// The task ends once the hub is dropped or every source closes.
    pub fn spawn_bridge(self: &Arc<Self>, dashboard: &Dashboard) -> JoinHandle<()> {
        let hub = Arc::downgrade(self);
        let dashboard_events = dashboard.subscribe();
        let theme_events = dashboard.theme().subscribe();
        let notification_events = dashboard.notifications().subscribe();

        tokio::spawn(run_bridge(
            hub,
            dashboard_events,
            theme_events,
            notification_events,
        ))
    }
}

async fn run_bridge(
    hub: Weak<ConnectionHub>,
    mut dashboard_events: broadcast::Receiver<crate::dashboard::DashboardEvent>,
    mut theme_events: broadcast::Receiver<crate::dashboard::Theme>,
    mut notification_events: broadcast::Receiver<crate::dashboard::NotificationSummary>,
) {
    let mut dashboard_open = true;
    let mut theme_open = true;
    let mut notifications_open = true;

    while dashboard_open || theme_open || notifications_open {
        let event = tokio::select! {
            result = dashboard_events.recv(), if dashboard_open => {
                forward(result, &mut dashboard_open, WsEvent::from)
            }
            result = theme_events.recv(), if theme_open => {
                forward(result, &mut theme_open, WsEvent::theme)
            }
            result = notification_events.recv(), if notifications_open => {
                forward(result, &mut notifications_open, WsEvent::notifications)
            }
        };

        let Some(event) = event else {
            continue;
        };
        let Some(hub) = hub.upgrade() else {
            break;
        };
        hub.broadcast(&event).await;
    }

    tracing::debug!("WebSocket bridge stopped");
}

fn forward<T>(
    result: Result<T, RecvError>,
    open: &mut bool,
    convert: impl FnOnce(T) -> WsEvent,
) -> Option<WsEvent> {
    match result {
        Ok(value) => Some(convert(value)),
        Err(RecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "WebSocket bridge fell behind");
            None
        }
        Err(RecvError::Closed) => {
            *open = false;
            None
        }
    }
}

fn parse_topics(names: &[String]) -> Result<Vec<Topic>, HubError> {
    names.iter().map(|name| name.parse()).collect()
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {limit})")]
    TooManyConnections { limit: usize },

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,

    #[error("Unknown topic: {0} (expected metrics, live, table, theme or notifications)")]
    UnknownTopic(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SortField;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register(tx).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(hub.connection_count().await, 1);
        assert_eq!(hub.subscription_count(Topic::Metrics).await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_unsubscribe() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        let removed = hub
            .unsubscribe(&id, &topics(&["metrics", "theme"]))
            .await
            .unwrap();
        assert_eq!(removed, vec![Topic::Metrics, Topic::Theme]);
        assert_eq!(hub.subscription_count(Topic::Metrics).await, 0);

        // Already removed
        let removed = hub.unsubscribe(&id, &topics(&["metrics"])).await.unwrap();
        assert!(removed.is_empty());

        let added = hub.subscribe(&id, &topics(&["metrics"])).await.unwrap();
        assert_eq!(added, vec![Topic::Metrics]);
        assert_eq!(hub.subscription_count(Topic::Metrics).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_topic_rejects_request() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        let result = hub.unsubscribe(&id, &topics(&["metrics", "weather"])).await;
        assert!(matches!(result, Err(HubError::UnknownTopic(t)) if t == "weather"));
        assert_eq!(hub.subscription_count(Topic::Metrics).await, 1);
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = ConnectionHub::new(HubConfig { max_connections: 2 });

        let (tx1, _) = mpsc::unbounded_channel();
        let (tx2, _) = mpsc::unbounded_channel();
        let (tx3, _) = mpsc::unbounded_channel();

        hub.register(tx1).await.unwrap();
        hub.register(tx2).await.unwrap();
        let result = hub.register(tx3).await;

        assert!(matches!(
            result,
            Err(HubError::TooManyConnections { limit: 2 })
        ));
    }

    #[tokio::test]
    async fn test_broadcast_respects_topics() {
        let hub = ConnectionHub::new(HubConfig::default());

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        hub.register(tx1).await.unwrap();
        let id2 = hub.register(tx2).await.unwrap();

        hub.unsubscribe(&id2, &topics(&["theme"])).await.unwrap();

        let sent = hub.broadcast(&WsEvent::theme(crate::dashboard::Theme::Dark)).await;
        assert_eq!(sent, 1);
        assert!(matches!(
            rx1.try_recv(),
            Ok(ServerMessage::ThemeChanged { .. })
        ));
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_bridge_forwards_dashboard_changes() {
        let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
        let dashboard = Arc::new(Dashboard::default());
        let _bridge = hub.spawn_bridge(&dashboard);

        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register(tx).await.unwrap();

        dashboard.sort_campaigns(SortField::Ctr).await;
        match rx.recv().await.unwrap() {
            ServerMessage::TableChanged { state, page } => {
                assert_eq!(state.sort_field, SortField::Ctr);
                assert_eq!(page.rows.len(), 5);
            }
            other => panic!("Expected TableChanged, got {:?}", other),
        }

        dashboard.notifications().mark_all_read().await;
        assert!(matches!(
            rx.recv().await.unwrap(),
            ServerMessage::NotificationsChanged { summary } if summary.unread == 0
        ));
    }
}
