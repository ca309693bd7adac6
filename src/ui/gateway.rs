//! Broadcast gateway.
//!
//! The narrow seam between the protocol and the transport: events go out
//! to one connection or to a list of connections, serialized once and
//! pushed onto per-connection channels. Delivery is fire-and-forget; a
//! failed send is logged and skipped, never retried, and never fails the
//! protocol operation that caused it.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, mpsc};

use crate::{domain::ConnectionId, infrastructure::dto::websocket::ServerEvent};

/// Client connection information
pub struct ClientInfo {
    /// Outbound message channel, drained by the socket send task
    pub sender: mpsc::UnboundedSender<String>,
    /// Unix timestamp when connected (milliseconds)
    pub connected_at: i64,
}

/// Fire-and-forget event delivery to active connections.
#[derive(Clone, Default)]
pub struct BroadcastGateway {
    clients: Arc<Mutex<HashMap<String, ClientInfo>>>,
}

impl BroadcastGateway {
    /// Create a gateway with no attached connections
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection's outbound channel
    pub async fn attach(&self, id: &ConnectionId, info: ClientInfo) {
        let mut clients = self.clients.lock().await;
        clients.insert(id.as_str().to_string(), info);
    }

    /// Detach a connection's outbound channel
    pub async fn detach(&self, id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(id.as_str());
    }

    /// Deliver an event to a single connection
    pub async fn emit_to(&self, id: &ConnectionId, event: &ServerEvent) {
        let Some(json) = encode(event) else { return };
        let clients = self.clients.lock().await;
        if let Some(info) = clients.get(id.as_str())
            && info.sender.send(json).is_err()
        {
            tracing::warn!("Failed to deliver event to client '{}'", id);
        }
    }

    /// Deliver an event to every listed connection
    pub async fn emit_to_many(&self, ids: &[ConnectionId], event: &ServerEvent) {
        let Some(json) = encode(event) else { return };
        let clients = self.clients.lock().await;
        for id in ids {
            if let Some(info) = clients.get(id.as_str())
                && info.sender.send(json.clone()).is_err()
            {
                tracing::warn!("Failed to deliver event to client '{}'", id);
            }
        }
    }

    /// Number of attached connections
    pub async fn count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to encode server event: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_emit_to_attached_connection() {
        // given:
        let gateway = BroadcastGateway::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        gateway
            .attach(&conn("c1"), ClientInfo { sender: tx, connected_at: 0 })
            .await;

        // when:
        gateway
            .emit_to(
                &conn("c1"),
                &ServerEvent::RoomCreated { room: "lobby".to_string() },
            )
            .await;

        // then:
        let frame = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "room_created");
        assert_eq!(value["data"]["room"], "lobby");
    }

    #[tokio::test]
    async fn test_emit_to_unknown_connection_is_silent() {
        // given:
        let gateway = BroadcastGateway::new();

        // when/then: no panic, nothing happens
        gateway
            .emit_to(
                &conn("ghost"),
                &ServerEvent::RoomCreated { room: "lobby".to_string() },
            )
            .await;
    }

    #[tokio::test]
    async fn test_emit_to_many_skips_detached() {
        // given: two attached connections, one of which detaches
        let gateway = BroadcastGateway::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        gateway
            .attach(&conn("c1"), ClientInfo { sender: tx1, connected_at: 0 })
            .await;
        gateway
            .attach(&conn("c2"), ClientInfo { sender: tx2, connected_at: 0 })
            .await;
        gateway.detach(&conn("c2")).await;

        // when:
        gateway
            .emit_to_many(
                &[conn("c1"), conn("c2")],
                &ServerEvent::RoomCreated { room: "lobby".to_string() },
            )
            .await;

        // then: only the attached connection receives the frame
        assert!(rx1.recv().await.is_some());
        assert!(rx2.try_recv().is_err());
        assert_eq!(gateway.count().await, 1);
    }
}
