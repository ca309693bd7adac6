//! In-memory session repository.
//!
//! Concrete implementation of the `SessionRepository` trait defined by the
//! domain layer. The Connection Registry and the Room Registry live behind
//! one `tokio::sync::Mutex`, and every trait method completes its whole
//! read-modify-write cycle under a single lock hold. That is the exclusive
//! access discipline the membership invariant relies on: a join and a
//! concurrent disconnect for different users in the same room serialize
//! here instead of interleaving.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, ConnectionRegistry, DisconnectOutcome, MemberSnapshot, MessageScope,
    PasswordHash, ProtocolError, RegistryError, RoomName, RoomRegistry, RoomSnapshot,
    SessionRepository, Timestamp, User, Username,
};

/// All mutable session state, guarded as one unit.
#[derive(Debug, Default)]
struct SessionState {
    connections: ConnectionRegistry,
    rooms: RoomRegistry,
}

impl SessionState {
    /// Overwrite the user's display name, or recreate the record if the
    /// connect-time registration is somehow absent.
    fn rename_or_register(&mut self, id: &ConnectionId, username: Username, now: Timestamp) {
        match self.connections.lookup_mut(id) {
            Some(user) => {
                user.username = username;
                user.last_active = now;
            }
            None => {
                // absence was just observed, so register cannot fail
                let _ = self.connections.register(User::new(id.clone(), username, now));
            }
        }
    }

    /// Move the user into the room, detaching from any previous room so
    /// the bidirectional membership invariant keeps holding.
    fn attach_member(&mut self, id: &ConnectionId, name: &RoomName) {
        let SessionState { connections, rooms } = self;
        if let Some(user) = connections.lookup_mut(id) {
            if let Some(previous) = user.room.clone()
                && previous != *name
            {
                rooms.remove_member(&previous, user);
            }
            rooms.add_member(name, user);
        }
    }

    /// Build a point-in-time view of a room's membership.
    fn snapshot(&self, name: &RoomName) -> Option<RoomSnapshot> {
        let room = self.rooms.get(name)?;
        let mut members: Vec<MemberSnapshot> = room
            .members
            .iter()
            .filter_map(|id| self.connections.lookup(id))
            .map(|user| MemberSnapshot {
                id: user.id.clone(),
                username: user.username.clone(),
                room: user.room.clone(),
            })
            .collect();
        // HashSet iteration order is arbitrary; sort for consistent fan-out
        members.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Some(RoomSnapshot {
            name: room.name.clone(),
            members,
            created_at: room.created_at,
            protected: room.is_protected(),
        })
    }
}

/// In-memory `SessionRepository` implementation.
///
/// This is the single coordinating owner of connection and room state;
/// request handlers receive it by `Arc` rather than touching ambient
/// globals.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    state: Mutex<SessionState>,
}

impl InMemorySessionRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn register(&self, user: User) -> Result<(), RegistryError> {
        let mut state = self.state.lock().await;
        state.connections.register(user)
    }

    async fn lookup_user(&self, id: &ConnectionId) -> Option<User> {
        let state = self.state.lock().await;
        state.connections.lookup(id).cloned()
    }

    async fn create_and_join(
        &self,
        id: &ConnectionId,
        name: RoomName,
        password_hash: Option<PasswordHash>,
        username: Username,
        now: Timestamp,
    ) -> Result<RoomSnapshot, ProtocolError> {
        let mut state = self.state.lock().await;

        // On a name collision nothing below runs: the registries stay
        // untouched, including the caller's username.
        state.rooms.create(name.clone(), password_hash, now)?;

        state.rename_or_register(id, username, now);
        state.attach_member(id, &name);

        state.snapshot(&name).ok_or(ProtocolError::RoomNotFound)
    }

    async fn join(
        &self,
        id: &ConnectionId,
        name: RoomName,
        password: Option<String>,
        username: Username,
        now: Timestamp,
    ) -> Result<RoomSnapshot, ProtocolError> {
        let mut state = self.state.lock().await;

        // Existence first, then password: a nonexistent room must not
        // reveal whether it would have required one.
        let room = state.rooms.get(&name).ok_or(ProtocolError::RoomNotFound)?;
        if !room.verify_password(password.as_deref()) {
            return Err(ProtocolError::InvalidPassword);
        }

        state.rename_or_register(id, username, now);
        state.attach_member(id, &name);

        state.snapshot(&name).ok_or(ProtocolError::RoomNotFound)
    }

    async fn message_scope(&self, id: &ConnectionId) -> Result<MessageScope, ProtocolError> {
        let state = self.state.lock().await;
        let user = state.connections.lookup(id).ok_or(ProtocolError::NotInRoom)?;
        let room_name = user.room.clone().ok_or(ProtocolError::NotInRoom)?;
        let room = state.rooms.get(&room_name).ok_or(ProtocolError::NotInRoom)?;

        let mut member_ids: Vec<ConnectionId> = room.members.iter().cloned().collect();
        member_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        Ok(MessageScope {
            sender: user.username.clone(),
            room: room_name,
            member_ids,
        })
    }

    async fn remove_connection(&self, id: &ConnectionId) -> Option<DisconnectOutcome> {
        let mut state = self.state.lock().await;

        // Membership cleanup happens before the record is dropped
        let mut user = state.connections.remove(id)?;
        let left = user.room.clone();
        if let Some(room_name) = &left {
            state.rooms.remove_member(room_name, &mut user);
        }

        let left_room = left.as_ref().and_then(|name| state.snapshot(name));
        Some(DisconnectOutcome { user, left_room })
    }

    async fn room_snapshots(&self) -> Vec<RoomSnapshot> {
        let state = self.state.lock().await;
        let mut names: Vec<RoomName> = state.rooms.iter().map(|r| r.name.clone()).collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
            .iter()
            .filter_map(|name| state.snapshot(name))
            .collect()
    }

    async fn room_snapshot(&self, name: &RoomName) -> Option<RoomSnapshot> {
        let state = self.state.lock().await;
        state.snapshot(name)
    }

    async fn count_connections(&self) -> usize {
        let state = self.state.lock().await;
        state.connections.len()
    }
}
