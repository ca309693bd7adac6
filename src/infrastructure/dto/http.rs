//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::{common::time::millis_to_rfc3339, domain::RoomSnapshot, infrastructure::dto::websocket::UserInfo};

/// Room summary for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub member_count: usize,
    pub protected: bool,
    pub created_at: String, // ISO 8601
}

impl From<&RoomSnapshot> for RoomSummaryDto {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            name: snapshot.name.as_str().to_string(),
            member_count: snapshot.members.len(),
            protected: snapshot.protected,
            created_at: millis_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

/// Room detail for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub members: Vec<UserInfo>,
    pub protected: bool,
    pub created_at: String, // ISO 8601
}

impl From<&RoomSnapshot> for RoomDetailDto {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            name: snapshot.name.as_str().to_string(),
            members: snapshot.members.iter().map(UserInfo::from).collect(),
            protected: snapshot.protected,
            created_at: millis_to_rfc3339(snapshot.created_at.value()),
        }
    }
}
