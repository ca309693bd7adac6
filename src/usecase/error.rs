//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::ValueObjectError;

/// Errors raised while establishing a connection.
///
/// These are transport-level failures, not protocol errors: the connection
/// is rejected before it ever reaches the room protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// The generated connection id collided with a live one (should not
    /// occur given the id space)
    #[error("connection id '{0}' is already registered")]
    DuplicateConnectionId(String),

    /// A generated identifier failed validation
    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),
}
