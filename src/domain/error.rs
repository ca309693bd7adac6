//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId too long error
    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },

    /// RoomName validation error
    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("RoomName cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },
}

/// Recoverable protocol errors, reported via an `error` event to the
/// originating connection only. The `Display` strings are the exact
/// wire-level `error` payload messages; they never terminate the
/// connection and never broadcast to other members.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// create_room with a name that is already taken
    #[error("Room already exists")]
    RoomAlreadyExists,

    /// join_room for a room that was never created. Checked before the
    /// password so a nonexistent room never leaks whether one is required.
    #[error("Room does not exist")]
    RoomNotFound,

    /// join_room with a wrong or missing password on a protected room
    #[error("Invalid password")]
    InvalidPassword,

    /// message sent while the connection is not in any room
    #[error("You must join a room before sending messages")]
    NotInRoom,

    /// message whose text is empty after trimming whitespace
    #[error("Cannot send empty message")]
    EmptyMessage,
}

/// Registry-level errors. These indicate a violated transport guarantee
/// (e.g. the transport reusing a live connection id) rather than a
/// client-visible protocol failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Connection id already present in the registry
    #[error("connection '{0}' is already registered")]
    AlreadyRegistered(String),
}
