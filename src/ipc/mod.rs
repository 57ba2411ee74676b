//! IPC (Inter-Process Communication) Module
//!
//! Unix socket link between the puppet daemon and external producers
//! (hand detector, speech recognizer, tooling).
//! Protocol: JSON over newline-delimited messages.

pub mod client;
pub mod messages;
pub mod server;

pub use client::IpcClient;
pub use messages::*;
pub use server::IpcServer;

use std::path::PathBuf;

/// Maximum accepted request line, in bytes
pub const MAX_MESSAGE_BYTES: u64 = 64 * 1024;

/// Default Unix socket path for IPC
pub fn socket_path() -> PathBuf {
    let user = std::env::var("USER").unwrap_or_else(|_| "handpuppet".to_string());
    PathBuf::from(format!("/tmp/handpuppet-{}.sock", user))
}
