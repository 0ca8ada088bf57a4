//! Shared types for the lobby TCP server.
//!
//! This module defines:
//! - `Outbound`: what the session task asks a connection writer to do
//! - `SessionEvent`: messages flowing from the transport into the session
//! - channel aliases between connection tasks and the session task

use std::net::SocketAddr;

use lobby_core::ConnectionId;
use tokio::sync::mpsc;

/// Instruction for a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Already-formatted, newline-terminated text.
    Text(String),

    /// Shut the connection down.
    Close,
}

/// Outbound channel for a single connection.
pub type OutboundTx = mpsc::UnboundedSender<Outbound>;
pub type OutboundRx = mpsc::UnboundedReceiver<Outbound>;

/// Event flowing from the transport into the session task.
#[derive(Debug)]
pub enum SessionEvent {
    /// A connection was accepted.
    Connected {
        connection: ConnectionId,
        peer: SocketAddr,
        outbound: OutboundTx,
    },

    /// One complete line arrived.
    Line {
        connection: ConnectionId,
        line: String,
    },

    /// Peer closed, or the connection failed.
    Closed { connection: ConnectionId },
}

/// Channel from connection tasks → session task.
pub type SessionTx = mpsc::UnboundedSender<SessionEvent>;
pub type SessionRx = mpsc::UnboundedReceiver<SessionEvent>;
