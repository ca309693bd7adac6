//! UseCase: broadcast a message to the caller's room.

use std::sync::Arc;

use crate::{
    common::time::now_rfc3339,
    domain::{ConnectionId, ProtocolError, RoomName, SessionRepository, Username},
};

/// A message ready for delivery: the envelope fields of the wire contract
/// plus the connection ids of every current member of the room (the sender
/// included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub sender: Username,
    pub text: String,
    /// ISO 8601
    pub timestamp: String,
    pub room: RoomName,
    pub targets: Vec<ConnectionId>,
}

/// Message broadcast use case
pub struct SendMessageUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl SendMessageUseCase {
    /// Create a new SendMessageUseCase
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Validate and prepare a message broadcast.
    ///
    /// Room membership is checked before the text, matching the protocol's
    /// error precedence. The text is trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// `ProtocolError::NotInRoom` when the caller has not joined a room,
    /// `ProtocolError::EmptyMessage` when the text is empty after trimming.
    pub async fn execute(
        &self,
        id: &ConnectionId,
        text: &str,
    ) -> Result<OutgoingMessage, ProtocolError> {
        let scope = self.repository.message_scope(id).await?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ProtocolError::EmptyMessage);
        }

        Ok(OutgoingMessage {
            sender: scope.sender,
            text: trimmed.to_string(),
            timestamp: now_rfc3339(),
            room: scope.room,
            targets: scope.member_ids,
        })
    }
}
