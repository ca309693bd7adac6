//! Domain factories for generating identifiers and guest names.

use rand::Rng;

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, Username},
};

/// Factory for generating connection identifiers.
///
/// The transport layer assigns one opaque id per active connection; this
/// factory encapsulates that generation (a random UUID v4).
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId.
    ///
    /// # Errors
    ///
    /// Does not fail in practice; a UUID v4 string always validates.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        ConnectionId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Factory for generating guest names.
///
/// Every connection starts out as `Guest_<8 random hex chars>` until the
/// user supplies a real name on join/create.
pub struct GuestNameFactory;

impl GuestNameFactory {
    /// Generate a new guest Username.
    ///
    /// # Errors
    ///
    /// Does not fail in practice; the generated name always validates.
    pub fn generate() -> Result<Username, ValueObjectError> {
        let suffix: [u8; 4] = rand::rng().random();
        Username::new(format!("Guest_{}", hex::encode(suffix)))
    }
}
