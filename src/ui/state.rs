//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::SessionRepository, infrastructure::repository::InMemorySessionRepository,
    ui::gateway::BroadcastGateway,
};

/// Shared application state, passed by reference to every handler.
pub struct AppState {
    /// Session repository (data access abstraction)
    pub repository: Arc<dyn SessionRepository>,
    /// Outbound event delivery
    pub gateway: BroadcastGateway,
}

impl AppState {
    /// Fresh state backed by the in-memory repository
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemorySessionRepository::new()),
            gateway: BroadcastGateway::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
