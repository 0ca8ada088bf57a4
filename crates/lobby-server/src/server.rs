//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ConnectionId`.
//! - Spawns:
//!   - a per-connection task to handle I/O,
//!   - a single session task that owns the lobby state.
//!
//! Capacity is enforced by the session, not here: every connection is
//! accepted and handed over, and the session answers "lobby full" and
//! closes it when there is no free slot.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use lobby_core::{ConnectionId, SlotReuse};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::client;
use crate::config::Config;
use crate::session_task;
use crate::types::{OutboundRx, OutboundTx, SessionEvent, SessionRx, SessionTx};

/// Counter for assigning unique `ConnectionId`s.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> ConnectionId {
    ConnectionId(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
}

/// Bind the configured address and serve until a fatal error.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "game lobby created, waiting for players to join");

    serve(listener, config.slot_reuse).await
}

/// Serve the lobby on an already-bound listener.
///
/// Only an accept failure ends this; per-connection errors never do.
pub async fn serve(listener: TcpListener, reuse: SlotReuse) -> Result<()> {
    // Channel from connections → session task.
    let (session_tx, session_rx): (SessionTx, SessionRx) = mpsc::unbounded_channel();

    tokio::spawn(session_task::run_session_loop(session_rx, reuse));

    loop {
        let (stream, peer) = listener.accept().await.context("accept failed")?;

        let connection = next_connection_id();
        debug!(connection = connection.0, %peer, "accepted connection");

        // Create outbound channel for this connection.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        // Announce before any of its lines can arrive.
        session_tx
            .send(SessionEvent::Connected {
                connection,
                peer,
                outbound: out_tx,
            })
            .context("session task stopped")?;

        let session_tx = session_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = client::run_client(connection, stream, session_tx, out_rx).await {
                debug!(connection = connection.0, error = %e, "connection ended with error");
            }
        });
    }
}
