//! UseCase: establish a new connection.
//!
//! Registers a fresh user record under a transport-assigned connection id
//! with an auto-generated guest name. The real display name arrives later,
//! with the first create_room/join_room event.

use std::sync::Arc;

use crate::{
    common::time::now_millis,
    domain::{ConnectionIdFactory, GuestNameFactory, RegistryError, SessionRepository, Timestamp, User},
};

use super::error::ConnectError;

/// Connection establishment use case
pub struct ConnectUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl ConnectUseCase {
    /// Create a new ConnectUseCase
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Register a new connection.
    ///
    /// # Returns
    ///
    /// The created user record, whose id and guest name are confirmed back
    /// to the caller by the transport handler.
    pub async fn execute(&self) -> Result<User, ConnectError> {
        let id = ConnectionIdFactory::generate()?;
        let username = GuestNameFactory::generate()?;
        let user = User::new(id, username, Timestamp::new(now_millis()));

        self.repository
            .register(user.clone())
            .await
            .map_err(|RegistryError::AlreadyRegistered(taken)| {
                ConnectError::DuplicateConnectionId(taken)
            })?;

        Ok(user)
    }
}
