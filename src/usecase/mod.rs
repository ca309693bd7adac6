//! UseCase layer: the presence/room protocol handler.
//!
//! One use case per inbound protocol event. Called from the UI layer,
//! operating on the domain layer through the repository trait.

pub mod connect;
pub mod create_room;
pub mod disconnect;
pub mod error;
pub mod join_room;
pub mod send_message;

pub use connect::ConnectUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::ConnectError;
pub use join_room::JoinRoomUseCase;
pub use send_message::{OutgoingMessage, SendMessageUseCase};
