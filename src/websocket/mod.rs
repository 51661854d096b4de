//! WebSocket Real-Time Streaming
//!
//! Pushes dashboard changes to clients as they happen.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Manages all active connections and subscriptions,
//!   and bridges dashboard change streams onto them
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Usage
//!
//! Clients connect to `/ws`, receive `connected` and a full `snapshot`, and
//! are subscribed to every topic: `metrics`, `live`, `table`, `theme`,
//! `notifications`. They can also drive the dashboard:
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8090/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'unsubscribe', topics: ['notifications']}));
//!   ws.send(JSON.stringify({type: 'set_live', enabled: true}));
//!   ws.send(JSON.stringify({type: 'sort', field: 'ctr'}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   console.log('Received:', msg);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage, Topic, WsEvent};
