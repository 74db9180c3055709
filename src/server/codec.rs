//! Wire codec for the chat transport.
//!
//! Outgoing text is framed as raw UTF-8 bytes terminated by CRLF. Inbound
//! bytes arrive in chunks; each chunk is decoded and trimmed into one text
//! line. There is no length framing beyond what TCP itself provides.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::error;

/// Read buffer size for one inbound chunk.
const CHUNK_SIZE: usize = 1024;

/// Encode an outgoing text payload into the exact bytes written to the
/// transport.
pub fn encode(payload: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 2);
    bytes.extend_from_slice(payload.as_bytes());
    bytes.extend_from_slice(b"\r\n");
    bytes
}

/// Reads inbound chunks and turns them into trimmed text lines.
pub struct ChunkReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    /// Wrap a transport read half.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0u8; CHUNK_SIZE],
        }
    }

    /// Read the next line.
    ///
    /// Returns `Ok(None)` on EOF. The returned line is trimmed of
    /// surrounding whitespace and may be empty; callers discard empty
    /// lines before interpretation.
    pub async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let count = self.reader.read(&mut self.buf).await?;
        if count == 0 {
            return Ok(None);
        }

        let text = String::from_utf8_lossy(&self.buf[..count])
            .trim()
            .to_string();
        Ok(Some(text))
    }
}

/// Drain a session's outbound queue into its transport write half.
///
/// A write failure is logged and the loop ends; the session's own read
/// loop detects the dead connection and tears the session down. The codec
/// never closes connections itself.
pub async fn write_loop<W: AsyncWrite + Unpin>(mut writer: W, mut outbox: mpsc::Receiver<String>) {
    while let Some(line) = outbox.recv().await {
        if let Err(e) = writer.write_all(&encode(&line)).await {
            error!("outbound write failed: {}", e);
            break;
        }
    }
}
