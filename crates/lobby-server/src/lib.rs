//! lobby-server
//!
//! Async TCP transport for the spell lobby.

pub mod config;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod client;
mod session_task;
