//! Room-based realtime chat server library.
//!
//! Clients connect over WebSocket, create or join named rooms (optionally
//! password-protected) and exchange broadcast messages with the other
//! members of their room.

pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run_server;
