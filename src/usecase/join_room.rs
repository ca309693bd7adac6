//! UseCase: join an existing room.

use std::sync::Arc;

use crate::{
    common::time::now_millis,
    domain::{
        ConnectionId, ProtocolError, RoomName, RoomSnapshot, SessionRepository, Timestamp,
        Username,
    },
};

/// Room join use case
pub struct JoinRoomUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl JoinRoomUseCase {
    /// Create a new JoinRoomUseCase
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Join the room, renaming the caller to the supplied display name.
    ///
    /// # Errors
    ///
    /// `ProtocolError::RoomNotFound` when no room has that name (checked
    /// first), `ProtocolError::InvalidPassword` when the room is protected
    /// and the supplied password does not verify. On error nothing
    /// changes, including the caller's username.
    pub async fn execute(
        &self,
        id: &ConnectionId,
        room: RoomName,
        password: Option<String>,
        username: Username,
    ) -> Result<RoomSnapshot, ProtocolError> {
        self.repository
            .join(id, room, password, username, Timestamp::new(now_millis()))
            .await
    }
}
