//! UseCase: tear down a connection.
//!
//! Always removes the user record; when the user occupied a room, the
//! membership is detached first and the remaining members are returned so
//! the transport can notify them.

use std::sync::Arc;

use crate::domain::{ConnectionId, DisconnectOutcome, SessionRepository};

/// Disconnect handling use case
pub struct DisconnectUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl DisconnectUseCase {
    /// Create a new DisconnectUseCase
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Remove the connection.
    ///
    /// Returns None when the id was never registered (e.g. a transport
    /// close signal raced an earlier cleanup); that is not an error.
    pub async fn execute(&self, id: &ConnectionId) -> Option<DisconnectOutcome> {
        self.repository.remove_connection(id).await
    }
}
