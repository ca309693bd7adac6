//! UI layer: transport handlers, router and server runner.

pub mod gateway;
pub mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{app, run_server};
