//! Per-connection session handling.
//!
//! Each connection gets two tasks: this read loop, which blocks only on
//! the transport read, and a writer task draining the session's bounded
//! outbound queue. Other sessions never write into this connection
//! directly; they hand lines to the queue.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::chat::delivery::{self, OUTBOX_CAPACITY};
use crate::chat::dispatch::{self, Context, Control};
use crate::chat::messages;

use super::codec::{self, ChunkReader};

/// Serve one connection until EOF, a read error, or an explicit /exit.
pub async fn run(stream: TcpStream, peer_addr: SocketAddr, ctx: Arc<Context>) {
    let (read_half, write_half) = stream.into_split();

    let (outbox, outbox_rx) = mpsc::channel(OUTBOX_CAPACITY);
    tokio::spawn(codec::write_loop(write_half, outbox_rx));

    let joined = ctx.registry.connect(outbox.clone()).await;
    info!("session for {} connected from {}", joined.name, peer_addr);
    delivery::send_one(&outbox, messages::welcome(&joined.name, joined.online));

    let mut reader = ChunkReader::new(read_half);
    loop {
        match reader.read_line().await {
            Ok(None) => {
                debug!("connection from {} closed", peer_addr);
                break;
            }
            Err(e) => {
                warn!("read error on {}: {}", peer_addr, e);
                break;
            }
            Ok(Some(line)) => {
                if dispatch::handle_line(&ctx, joined.id, &outbox, &line).await
                    == Control::Disconnect
                {
                    break;
                }
            }
        }
    }

    // Teardown: drop the user everywhere and tell the others. Removing the
    // registry entry drops the last queue sender, which ends the writer.
    let notices = ctx.registry.disconnect(joined.id).await;
    delivery::send_all(notices);
    info!("session from {} closed", peer_addr);
}
