//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::error::ValueObjectError;

/// Connection identifier value object.
///
/// Opaque per-session handle assigned by the transport for one active
/// realtime connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new ConnectionId.
    ///
    /// # Arguments
    ///
    /// * `id` - The connection identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the ConnectionId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        let len = id.len();
        if len > 100 {
            return Err(ValueObjectError::ConnectionIdTooLong {
                max: 100,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name value object.
///
/// The room name is chosen by the creator and acts as the room's identity;
/// there is no separate room ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName.
    ///
    /// # Arguments
    ///
    /// * `name` - The room name string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = name.len();
        if len > 100 {
            return Err(ValueObjectError::RoomNameTooLong {
                max: 100,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username value object.
///
/// Display name for a connected user. Uniqueness is NOT enforced;
/// duplicate display names are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new Username.
    ///
    /// # Arguments
    ///
    /// * `name` - The display name string
    ///
    /// # Returns
    ///
    /// A Result containing the Username or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::UsernameEmpty);
        }
        let len = name.len();
        if len > 100 {
            return Err(ValueObjectError::UsernameTooLong {
                max: 100,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Password hash value object.
///
/// Stores the hex-encoded SHA-256 digest of a room password. The plaintext
/// password is never stored; verification compares digests. The digest is
/// unsalted, which the wire contract fixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password.
    pub fn digest(plaintext: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the hex-encoded digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_success() {
        // given:
        let id = "3f2c1d9e-0a4b-4c8d-9e7f-1a2b3c4d5e6f".to_string();

        // when:
        let result = ConnectionId::new(id.clone());

        // then:
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), id);
    }

    #[test]
    fn test_connection_id_new_empty_fails() {
        // when:
        let result = ConnectionId::new("".to_string());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::ConnectionIdEmpty);
    }

    #[test]
    fn test_connection_id_new_too_long_fails() {
        // given:
        let id = "a".repeat(101);

        // when:
        let result = ConnectionId::new(id);

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ConnectionIdTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_room_name_new_success() {
        // when:
        let result = RoomName::new("lobby".to_string());

        // then:
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "lobby");
    }

    #[test]
    fn test_room_name_new_empty_fails() {
        // when:
        let result = RoomName::new("".to_string());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::RoomNameEmpty);
    }

    #[test]
    fn test_username_new_success() {
        // when:
        let result = Username::new("alice".to_string());

        // then:
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_username_duplicates_are_equal_values() {
        // given: two users picking the same display name
        let a = Username::new("alice".to_string()).unwrap();
        let b = Username::new("alice".to_string()).unwrap();

        // then: value objects compare equal, no uniqueness constraint
        assert_eq!(a, b);
    }

    #[test]
    fn test_password_hash_digest_is_sha256_hex() {
        // given:
        let hash = PasswordHash::digest("x123");

        // then: stable hex digest, sensitive to the input
        assert_eq!(hash.as_str().len(), 64);
        assert!(hash.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, PasswordHash::digest("x123"));
        assert_ne!(hash, PasswordHash::digest("x124"));
    }

    #[test]
    fn test_timestamp_ordering() {
        // given:
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then:
        assert!(ts1 < ts2);
        assert_eq!(ts1.value(), 1000);
    }
}
