// crates/lobby-server/src/client.rs

use anyhow::Result;
use lobby_core::ConnectionId;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::types::{Outbound, OutboundRx, SessionEvent, SessionTx};

/// Run the I/O loop for a single connection.
///
/// Lines go to the session task; the writer drains `out_rx`. The
/// connection ends when the peer closes, an I/O error occurs, or the
/// session sends [`Outbound::Close`]. In every case a final
/// [`SessionEvent::Closed`] is reported.
pub async fn run_client(
    connection: ConnectionId,
    stream: TcpStream,
    session_tx: SessionTx,
    out_rx: OutboundRx,
) -> Result<()> {
    let (read_stream, write_stream) = stream.into_split();

    // Fires when the writer stops, for whatever reason.
    let (writer_done_tx, writer_done_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        run_writer(connection, write_stream, out_rx).await;
        let _ = writer_done_tx.send(());
    });

    let result = tokio::select! {
        res = run_line_reader(connection, read_stream, &session_tx) => res,
        _ = writer_done_rx => {
            debug!(connection = connection.0, "writer finished, dropping reader");
            Ok(())
        }
    };

    let _ = session_tx.send(SessionEvent::Closed { connection });
    result
}

async fn run_line_reader(
    connection: ConnectionId,
    mut read_stream: OwnedReadHalf,
    session_tx: &SessionTx,
) -> Result<()> {
    let mut buffer = Vec::new();
    let mut temp_buf = [0u8; 1024];

    loop {
        let n = read_stream.read(&mut temp_buf).await?;
        if n == 0 {
            debug!(connection = connection.0, "peer closed connection");
            // A final command without a trailing newline still counts.
            if !buffer.is_empty() {
                let line = String::from_utf8_lossy(&buffer).trim_end().to_string();
                let _ = session_tx.send(SessionEvent::Line { connection, line });
            }
            return Ok(());
        }

        buffer.extend_from_slice(&temp_buf[..n]);

        // Process complete lines
        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let raw = buffer.drain(..=newline_pos).collect::<Vec<u8>>();
            let line = String::from_utf8_lossy(&raw).trim_end().to_string();

            debug!(connection = connection.0, %line, "received line");

            if session_tx
                .send(SessionEvent::Line { connection, line })
                .is_err()
            {
                warn!("session channel closed");
                return Ok(());
            }
        }
    }
}

async fn run_writer(connection: ConnectionId, mut write_stream: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(out) = out_rx.recv().await {
        match out {
            Outbound::Text(text) => {
                if let Err(e) = write_text(&mut write_stream, &text).await {
                    debug!(connection = connection.0, error = %e, "write failed");
                    break;
                }
            }
            Outbound::Close => {
                let _ = write_stream.shutdown().await;
                break;
            }
        }
    }
}

async fn write_text(stream: &mut OwnedWriteHalf, text: &str) -> std::io::Result<()> {
    stream.write_all(text.as_bytes()).await?;
    stream.flush().await
}
