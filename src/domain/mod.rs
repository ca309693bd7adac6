//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{ConnectionRegistry, Room, RoomRegistry, User};
pub use error::{ProtocolError, RegistryError, ValueObjectError};
pub use factory::{ConnectionIdFactory, GuestNameFactory};
pub use repository::{
    DisconnectOutcome, MemberSnapshot, MessageScope, RoomSnapshot, SessionRepository,
};
pub use value_object::{ConnectionId, PasswordHash, RoomName, Timestamp, Username};
