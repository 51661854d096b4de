//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and manages the connection lifecycle.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::ConnectionHub;
use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::dashboard::Dashboard;
use crate::table::SortField;

/// WebSocket upgrade handler
///
/// Entry point for `/ws`. Upgrades the HTTP connection and starts message
/// handling.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = Arc::clone(&state.ws_hub);
    let dashboard = Arc::clone(&state.dashboard);
    ws.on_upgrade(move |socket| handle_socket(socket, hub, dashboard))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, hub: Arc<ConnectionHub>, dashboard: Arc<Dashboard>) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for sending messages to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let connection_id = match hub.register(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected WebSocket connection");
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            let _ = send_message(&mut sender, &error_msg).await;
            let _ = sender.close().await;
            return;
        }
    };

    // Connected, then the full state; changes queued meanwhile follow it
    let greeting = [
        ServerMessage::Connected {
            connection_id: connection_id.clone(),
        },
        snapshot(&dashboard).await,
    ];
    for message in &greeting {
        if send_message(&mut sender, message).await.is_err() {
            tracing::error!(connection_id = %connection_id, "Failed to send greeting");
            hub.unregister(&connection_id).await;
            return;
        }
    }

    let conn_id_for_send = connection_id.clone();

    // Task to forward messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if send_message(&mut sender, &msg).await.is_err() {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let conn_id_for_recv = connection_id.clone();

    // Task to receive messages from WebSocket and handle them
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&hub_for_recv, &dashboard, &conn_id_for_recv, msg).await
                    {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    hub.unregister(&connection_id).await;
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(text) => sender.send(Message::Text(text)).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            Ok(())
        }
    }
}

async fn snapshot(dashboard: &Dashboard) -> ServerMessage {
    ServerMessage::Snapshot {
        dashboard: dashboard.snapshot().await,
        table: dashboard.table_state().await,
        page: dashboard.campaigns_page().await,
        theme: dashboard.theme().get().await,
        notifications: dashboard.notifications().summary().await,
    }
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(
    hub: &ConnectionHub,
    dashboard: &Arc<Dashboard>,
    connection_id: &str,
    message: Message,
) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    let reply =
                        handle_client_message(hub, dashboard, connection_id, client_msg).await;
                    if let Some(reply) = reply {
                        let _ = hub.send_to(connection_id, reply).await;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    // Send error but keep connection open
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = hub.send_to(connection_id, error_msg).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(connection_id, error_msg).await;
            true
        }
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}

/// Handle a parsed client message, returning the direct reply if any
///
/// State changes are announced to every subscriber through the hub, so
/// successful commands only reply when nothing was broadcast.
async fn handle_client_message(
    hub: &ConnectionHub,
    dashboard: &Arc<Dashboard>,
    connection_id: &str,
    message: ClientMessage,
) -> Option<ServerMessage> {
    let reply = match message {
        ClientMessage::Subscribe { topics } => hub
            .subscribe(connection_id, &topics)
            .await
            .map(|topics| ServerMessage::Subscribed { topics })
            .map_err(|e| e.to_string()),
        ClientMessage::Unsubscribe { topics } => hub
            .unsubscribe(connection_id, &topics)
            .await
            .map(|topics| ServerMessage::Unsubscribed { topics })
            .map_err(|e| e.to_string()),
        ClientMessage::Ping => Ok(ServerMessage::Pong),
        ClientMessage::SetLive { enabled } => {
            if dashboard.set_live(enabled).await {
                return None;
            }
            Ok(ServerMessage::LiveChanged { enabled })
        }
        ClientMessage::Sort { field } => match field.parse::<SortField>() {
            Ok(field) => {
                dashboard.sort_campaigns(field).await;
                return None;
            }
            Err(e) => Err(e.to_string()),
        },
        ClientMessage::Page { page } => match dashboard.go_to_page(page).await {
            Ok(_) => return None,
            Err(e) => Err(e.to_string()),
        },
    };

    match reply {
        Ok(message) => Some(message),
        Err(message) => {
            tracing::debug!(connection_id = %connection_id, error = %message, "Client command failed");
            Some(ServerMessage::Error { message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::hub::HubConfig;

    async fn connection() -> (
        ConnectionHub,
        Arc<Dashboard>,
        String,
        mpsc::UnboundedReceiver<ServerMessage>,
    ) {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        (hub, Arc::new(Dashboard::default()), id, rx)
    }

    #[tokio::test]
    async fn test_ping() {
        let (hub, dashboard, id, _rx) = connection().await;
        let reply = handle_client_message(&hub, &dashboard, &id, ClientMessage::Ping).await;
        assert!(matches!(reply, Some(ServerMessage::Pong)));
    }

    #[tokio::test]
    async fn test_sort_command() {
        let (hub, dashboard, id, _rx) = connection().await;

        let reply = handle_client_message(
            &hub,
            &dashboard,
            &id,
            ClientMessage::Sort {
                field: "clicks".to_string(),
            },
        )
        .await;
        assert!(reply.is_none());
        assert_eq!(dashboard.table_state().await.sort_field, SortField::Clicks);

        let reply = handle_client_message(
            &hub,
            &dashboard,
            &id,
            ClientMessage::Sort {
                field: "budget".to_string(),
            },
        )
        .await;
        assert!(matches!(reply, Some(ServerMessage::Error { .. })));
    }

    #[tokio::test]
    async fn test_page_out_of_range_replies_error() {
        let (hub, dashboard, id, _rx) = connection().await;
        let reply =
            handle_client_message(&hub, &dashboard, &id, ClientMessage::Page { page: 9 }).await;
        match reply {
            Some(ServerMessage::Error { message }) => assert!(message.contains("out of range")),
            other => panic!("Expected Error, got {:?}", other),
        }
        assert_eq!(dashboard.table_state().await.current_page, 1);
    }

    #[tokio::test]
    async fn test_set_live_unchanged_acknowledges() {
        let (hub, dashboard, id, _rx) = connection().await;
        let reply = handle_client_message(
            &hub,
            &dashboard,
            &id,
            ClientMessage::SetLive { enabled: false },
        )
        .await;
        assert!(matches!(
            reply,
            Some(ServerMessage::LiveChanged { enabled: false })
        ));
    }

    #[tokio::test]
    async fn test_invalid_text_keeps_connection_open() {
        let (hub, dashboard, id, mut rx) = connection().await;
        let keep_open = handle_ws_message(
            &hub,
            &dashboard,
            &id,
            Message::Text("{\"type\":\"dance\"}".to_string()),
        )
        .await;

        assert!(keep_open);
        assert!(matches!(rx.recv().await, Some(ServerMessage::Error { .. })));
    }

    #[tokio::test]
    async fn test_close_ends_connection() {
        let (hub, dashboard, id, _rx) = connection().await;
        assert!(!handle_ws_message(&hub, &dashboard, &id, Message::Close(None)).await);
    }

    #[tokio::test]
    async fn test_snapshot_message() {
        let dashboard = Dashboard::default();
        match snapshot(&dashboard).await {
            ServerMessage::Snapshot {
                dashboard,
                page,
                notifications,
                ..
            } => {
                assert_eq!(dashboard.metrics.len(), 4);
                assert_eq!(page.total_records, 6);
                assert_eq!(notifications.unread, 2);
            }
            other => panic!("Expected Snapshot, got {:?}", other),
        }
    }
}
