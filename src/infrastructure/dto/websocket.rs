//! WebSocket wire DTOs.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.
//! The field names inside `data` are a fixed wire contract shared with the
//! clients; they must not drift.

use serde::{Deserialize, Serialize};

use crate::domain::{MemberSnapshot, ProtocolError, RoomSnapshot};

/// Inbound client events.
///
/// A closed set: adding or removing an event kind is a compile-time change,
/// and frames with an unknown `event` fail to parse instead of silently
/// routing nowhere.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Create a room and join it
    CreateRoom {
        room: String,
        #[serde(default)]
        password: Option<String>,
        username: String,
    },
    /// Join an existing room
    JoinRoom {
        room: String,
        #[serde(default)]
        password: Option<String>,
        username: String,
    },
    /// Broadcast a message to the caller's room
    Message { text: String },
}

/// Outbound server events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Connection confirmation with the assigned id and guest name
    UserConnected { id: String, username: String },
    /// Room creation confirmation, sent to the creator only
    RoomCreated { room: String },
    /// Join confirmation, sent to the joiner only
    RoomJoined { room: String, username: String },
    /// Updated member list, sent to every member of the room
    UserList { users: Vec<UserInfo> },
    /// Chat message envelope, sent to every member of the room
    Message {
        sender: String,
        text: String,
        /// ISO 8601
        timestamp: String,
        room: String,
    },
    /// A member disconnected, sent to the remaining members
    UserLeft {
        id: String,
        username: String,
        room: String,
    },
    /// Non-fatal protocol error, sent to the offending connection only
    Error { message: String },
}

impl ServerEvent {
    /// Wrap a protocol error in its wire shape
    pub fn error(error: &ProtocolError) -> Self {
        Self::Error {
            message: error.to_string(),
        }
    }

    /// Build a `user_list` event from a room snapshot
    pub fn user_list(snapshot: &RoomSnapshot) -> Self {
        Self::UserList {
            users: snapshot.members.iter().map(UserInfo::from).collect(),
        }
    }
}

/// One entry of a `user_list` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    /// Current room; null when the user is not in one
    pub room: Option<String>,
}

impl From<&MemberSnapshot> for UserInfo {
    fn from(member: &MemberSnapshot) -> Self {
        Self {
            id: member.id.as_str().to_string(),
            username: member.username.as_str().to_string(),
            room: member.room.as_ref().map(|r| r.as_str().to_string()),
        }
    }
}
