//! Session repository abstraction.
//!
//! The use case layer depends on this trait rather than on the concrete
//! in-memory implementation (dependency inversion). Implementations own
//! the Connection Registry and the Room Registry behind a single exclusive
//! lock, so every compound operation here is atomic with respect to every
//! other: a join and a concurrent disconnect cannot interleave halfway and
//! corrupt the members mapping.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{
    entity::User,
    error::{ProtocolError, RegistryError},
    value_object::{ConnectionId, PasswordHash, RoomName, Timestamp, Username},
};

/// Point-in-time view of a room, taken under the session lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub name: RoomName,
    pub members: Vec<MemberSnapshot>,
    pub created_at: Timestamp,
    pub protected: bool,
}

impl RoomSnapshot {
    /// Connection ids of the members, in snapshot order
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }
}

/// One member inside a `RoomSnapshot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub id: ConnectionId,
    pub username: Username,
    pub room: Option<RoomName>,
}

/// Sender identity and delivery targets for one message broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageScope {
    pub sender: Username,
    pub room: RoomName,
    pub member_ids: Vec<ConnectionId>,
}

/// Result of removing a connection.
#[derive(Debug, Clone)]
pub struct DisconnectOutcome {
    /// The removed user record
    pub user: User,
    /// The room the user occupied, snapshotted after the removal;
    /// None when the user was not in any room
    pub left_room: Option<RoomSnapshot>,
}

/// Coordinating owner of all connection and room state.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Register a newly connected user.
    ///
    /// # Errors
    ///
    /// `RegistryError::AlreadyRegistered` when the connection id is taken.
    async fn register(&self, user: User) -> Result<(), RegistryError>;

    /// Look up a user record by connection id
    async fn lookup_user(&self, id: &ConnectionId) -> Option<User>;

    /// Create a room and join it as one atomic step.
    ///
    /// Renames the caller, creates the room with the given password digest
    /// and inserts the caller as the first member under a single lock hold,
    /// so creation can never succeed with the join left dangling.
    ///
    /// # Errors
    ///
    /// `ProtocolError::RoomAlreadyExists` when the name is taken; no state
    /// changes at all in that case.
    async fn create_and_join(
        &self,
        id: &ConnectionId,
        name: RoomName,
        password_hash: Option<PasswordHash>,
        username: Username,
        now: Timestamp,
    ) -> Result<RoomSnapshot, ProtocolError>;

    /// Join an existing room.
    ///
    /// Existence is checked before the password, so a nonexistent-room
    /// error never leaks whether a password would have been required.
    /// On success the caller is renamed, detached from any previous room
    /// and inserted into the member set; on failure nothing changes.
    ///
    /// # Errors
    ///
    /// `ProtocolError::RoomNotFound` or `ProtocolError::InvalidPassword`.
    async fn join(
        &self,
        id: &ConnectionId,
        name: RoomName,
        password: Option<String>,
        username: Username,
        now: Timestamp,
    ) -> Result<RoomSnapshot, ProtocolError>;

    /// Resolve the sender identity and broadcast targets for a message
    /// from the given connection.
    ///
    /// # Errors
    ///
    /// `ProtocolError::NotInRoom` when the connection is not in any room.
    async fn message_scope(&self, id: &ConnectionId) -> Result<MessageScope, ProtocolError>;

    /// Remove a connection, detaching it from its room first.
    ///
    /// Returns None when the id was not registered. The contained
    /// `left_room` snapshot reflects the membership after removal, i.e.
    /// the remaining members to notify.
    async fn remove_connection(&self, id: &ConnectionId) -> Option<DisconnectOutcome>;

    /// Snapshots of every room (empty rooms included; they persist)
    async fn room_snapshots(&self) -> Vec<RoomSnapshot>;

    /// Snapshot of a single room by name
    async fn room_snapshot(&self, name: &RoomName) -> Option<RoomSnapshot>;

    /// Number of registered connections
    async fn count_connections(&self) -> usize;
}
