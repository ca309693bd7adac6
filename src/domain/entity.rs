//! Core domain models: users, rooms and the registries that own them.
//!
//! The Connection Registry exclusively owns `User` records (keyed by
//! connection id) and the Room Registry exclusively owns `Room` records
//! (keyed by name). Rooms hold non-owning back-references (connection ids)
//! to their members.

use std::collections::{HashMap, HashSet};

use super::{
    error::{ProtocolError, RegistryError},
    value_object::{ConnectionId, PasswordHash, RoomName, Timestamp, Username},
};

/// A connected user.
///
/// Created on connect with an auto-generated guest name; the username is
/// overwritten on join/create; destroyed on disconnect after its room
/// membership (if any) has been removed.
#[derive(Debug, Clone)]
pub struct User {
    /// Connection identifier assigned by the transport
    pub id: ConnectionId,
    /// Display name (guest name until the user supplies one)
    pub username: Username,
    /// Room the user currently occupies; None when not in a room
    pub room: Option<RoomName>,
    /// Timestamp when the connection was established (informational)
    pub connected_at: Timestamp,
    /// Timestamp of the last protocol activity (informational)
    pub last_active: Timestamp,
}

impl User {
    /// Create a new user that is not in any room yet
    pub fn new(id: ConnectionId, username: Username, connected_at: Timestamp) -> Self {
        Self {
            id,
            username,
            room: None,
            connected_at,
            last_active: connected_at,
        }
    }
}

/// A named, optionally password-protected group of connections.
///
/// The name is the room's identity. Rooms are never deleted when they
/// become empty; they persist for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Room {
    /// Unique room name, chosen by the creator
    pub name: RoomName,
    /// SHA-256 digest of the room password; None means the room is open
    password_hash: Option<PasswordHash>,
    /// Connection ids of the current members (back-references only)
    pub members: HashSet<ConnectionId>,
    /// Timestamp when the room was created (informational)
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new empty room
    pub fn new(name: RoomName, password_hash: Option<PasswordHash>, created_at: Timestamp) -> Self {
        Self {
            name,
            password_hash,
            members: HashSet::new(),
            created_at,
        }
    }

    /// Whether joining this room requires a password
    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Verify a supplied password against the stored digest.
    ///
    /// Always true when the room has no password. A protected room rejects
    /// a missing password with `false`, not with an error.
    pub fn verify_password(&self, supplied: Option<&str>) -> bool {
        match (&self.password_hash, supplied) {
            (None, _) => true,
            (Some(stored), Some(password)) => *stored == PasswordHash::digest(password),
            (Some(_), None) => false,
        }
    }

    /// Number of current members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Registry of active connections. Owns the `User` records.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    users: HashMap<ConnectionId, User>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AlreadyRegistered` if the connection id is
    /// already present (should not occur given transport guarantees).
    pub fn register(&mut self, user: User) -> Result<(), RegistryError> {
        if self.users.contains_key(&user.id) {
            return Err(RegistryError::AlreadyRegistered(
                user.id.as_str().to_string(),
            ));
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    /// Look up a user by connection id
    pub fn lookup(&self, id: &ConnectionId) -> Option<&User> {
        self.users.get(id)
    }

    /// Look up a user by connection id, mutably
    pub fn lookup_mut(&mut self, id: &ConnectionId) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    /// Overwrite a user's display name. Duplicate display names across
    /// users are allowed. Returns false when the id is unknown.
    pub fn rename(&mut self, id: &ConnectionId, username: Username) -> bool {
        match self.users.get_mut(id) {
            Some(user) => {
                user.username = username;
                true
            }
            None => false,
        }
    }

    /// Delete and return the user record. The caller is responsible for
    /// room cleanup.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<User> {
        self.users.remove(id)
    }

    /// Number of registered connections
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no connection is registered
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterate over all registered users
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }
}

/// Registry of rooms. Owns the `Room` records.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomName, Room>,
}

impl RoomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::RoomAlreadyExists` if a room with that name
    /// already exists; the existing room is left untouched.
    pub fn create(
        &mut self,
        name: RoomName,
        password_hash: Option<PasswordHash>,
        created_at: Timestamp,
    ) -> Result<(), ProtocolError> {
        if self.rooms.contains_key(&name) {
            return Err(ProtocolError::RoomAlreadyExists);
        }
        self.rooms
            .insert(name.clone(), Room::new(name, password_hash, created_at));
        Ok(())
    }

    /// Look up a room by name
    pub fn get(&self, name: &RoomName) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Insert the user into the room's member set and point the user's
    /// `room` field back at it. Idempotent when already a member.
    /// Returns false when the room does not exist.
    pub fn add_member(&mut self, name: &RoomName, user: &mut User) -> bool {
        match self.rooms.get_mut(name) {
            Some(room) => {
                room.members.insert(user.id.clone());
                user.room = Some(name.clone());
                true
            }
            None => false,
        }
    }

    /// Remove the user from the room's member set and clear the user's
    /// `room` field. Returns false when the user was not a member.
    pub fn remove_member(&mut self, name: &RoomName, user: &mut User) -> bool {
        match self.rooms.get_mut(name) {
            Some(room) => {
                let removed = room.members.remove(&user.id);
                if removed {
                    user.room = None;
                }
                removed
            }
            None => false,
        }
    }

    /// Iterate over all rooms
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str) -> User {
        User::new(
            ConnectionId::new(id.to_string()).unwrap(),
            Username::new(name.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    fn room_name(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_room_verify_password_open_room() {
        // given: a room without a password
        let room = Room::new(room_name("lobby"), None, Timestamp::new(0));

        // then: open to anyone, whatever they supply
        assert!(room.verify_password(None));
        assert!(room.verify_password(Some("anything")));
    }

    #[test]
    fn test_room_verify_password_protected_room() {
        // given: a room protected with "x123"
        let room = Room::new(
            room_name("lobby"),
            Some(PasswordHash::digest("x123")),
            Timestamp::new(0),
        );

        // then: only the matching password verifies; a missing password
        // is false, not an error
        assert!(room.verify_password(Some("x123")));
        assert!(!room.verify_password(Some("wrong")));
        assert!(!room.verify_password(None));
    }

    #[test]
    fn test_connection_registry_register_and_lookup() {
        // given:
        let mut registry = ConnectionRegistry::new();
        let alice = user("c1", "alice");

        // when:
        registry.register(alice.clone()).unwrap();

        // then:
        assert_eq!(registry.len(), 1);
        let found = registry.lookup(&alice.id).unwrap();
        assert_eq!(found.username.as_str(), "alice");
        assert!(found.room.is_none());
    }

    #[test]
    fn test_connection_registry_register_duplicate_fails() {
        // given:
        let mut registry = ConnectionRegistry::new();
        registry.register(user("c1", "alice")).unwrap();

        // when:
        let result = registry.register(user("c1", "impostor"));

        // then:
        assert_eq!(
            result.unwrap_err(),
            RegistryError::AlreadyRegistered("c1".to_string())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_connection_registry_rename_allows_duplicates() {
        // given: two connections
        let mut registry = ConnectionRegistry::new();
        let a = user("c1", "guest1");
        let b = user("c2", "guest2");
        registry.register(a.clone()).unwrap();
        registry.register(b.clone()).unwrap();

        // when: both pick the same display name
        assert!(registry.rename(&a.id, Username::new("alice".to_string()).unwrap()));
        assert!(registry.rename(&b.id, Username::new("alice".to_string()).unwrap()));

        // then: no uniqueness constraint across users
        assert_eq!(registry.lookup(&a.id).unwrap().username.as_str(), "alice");
        assert_eq!(registry.lookup(&b.id).unwrap().username.as_str(), "alice");
    }

    #[test]
    fn test_connection_registry_remove() {
        // given:
        let mut registry = ConnectionRegistry::new();
        let alice = user("c1", "alice");
        registry.register(alice.clone()).unwrap();

        // when:
        let removed = registry.remove(&alice.id);

        // then:
        assert_eq!(removed.unwrap().username.as_str(), "alice");
        assert!(registry.is_empty());
        assert!(registry.remove(&alice.id).is_none());
    }

    #[test]
    fn test_room_registry_create_duplicate_fails() {
        // given:
        let mut rooms = RoomRegistry::new();
        rooms
            .create(room_name("lobby"), None, Timestamp::new(0))
            .unwrap();
        let mut alice = user("c1", "alice");
        rooms.add_member(&room_name("lobby"), &mut alice);

        // when: creating a room with the taken name
        let result = rooms.create(
            room_name("lobby"),
            Some(PasswordHash::digest("pw")),
            Timestamp::new(1),
        );

        // then: fails and the existing room's membership is unchanged
        assert_eq!(result.unwrap_err(), ProtocolError::RoomAlreadyExists);
        let lobby = rooms.get(&room_name("lobby")).unwrap();
        assert_eq!(lobby.member_count(), 1);
        assert!(!lobby.is_protected());
    }

    #[test]
    fn test_room_registry_membership_is_bidirectional() {
        // given:
        let mut rooms = RoomRegistry::new();
        rooms
            .create(room_name("lobby"), None, Timestamp::new(0))
            .unwrap();
        let mut alice = user("c1", "alice");

        // when: joining
        assert!(rooms.add_member(&room_name("lobby"), &mut alice));

        // then: member set and back-reference agree
        assert!(rooms.get(&room_name("lobby")).unwrap().members.contains(&alice.id));
        assert_eq!(alice.room, Some(room_name("lobby")));

        // when: leaving
        assert!(rooms.remove_member(&room_name("lobby"), &mut alice));

        // then: both sides cleared, the empty room persists
        assert!(!rooms.get(&room_name("lobby")).unwrap().members.contains(&alice.id));
        assert!(alice.room.is_none());
        assert!(rooms.get(&room_name("lobby")).is_some());
    }

    #[test]
    fn test_room_registry_add_member_idempotent() {
        // given:
        let mut rooms = RoomRegistry::new();
        rooms
            .create(room_name("lobby"), None, Timestamp::new(0))
            .unwrap();
        let mut alice = user("c1", "alice");

        // when: joining twice
        rooms.add_member(&room_name("lobby"), &mut alice);
        rooms.add_member(&room_name("lobby"), &mut alice);

        // then: still a single membership
        assert_eq!(rooms.get(&room_name("lobby")).unwrap().member_count(), 1);
    }

    #[test]
    fn test_room_registry_remove_nonmember_is_noop() {
        // given:
        let mut rooms = RoomRegistry::new();
        rooms
            .create(room_name("lobby"), None, Timestamp::new(0))
            .unwrap();
        let mut bob = user("c2", "bob");

        // when:
        let removed = rooms.remove_member(&room_name("lobby"), &mut bob);

        // then:
        assert!(!removed);
    }
}
