//! Broadcast/delivery engine.
//!
//! Registry operations compute recipient snapshots under the lock; the
//! actual handoff to each recipient's bounded outbound queue happens here,
//! outside it. A full or closed queue drops that one delivery and is
//! logged; the remaining recipients are unaffected.

use chrono::Local;
use tokio::sync::mpsc;
use tracing::error;

/// Per-session outbound queue handle.
pub type Outbox = mpsc::Sender<String>;

/// Bound on each session's outbound queue. A peer that falls further
/// behind than this starts losing lines instead of blocking senders.
pub const OUTBOX_CAPACITY: usize = 64;

/// One composed payload addressed to one recipient.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub to: Outbox,
    pub line: String,
}

/// Local wall-clock timestamp used in message composition.
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Compose a room-broadcast payload.
pub fn broadcast_line(sender: &str, text: &str) -> String {
    format!("{} > {} :: {}", timestamp(), sender, text)
}

/// Compose a private-message payload.
pub fn private_line(sender: &str, text: &str) -> String {
    format!(
        "{} > *** PRIVATE MESSAGE *** > {} :: {}",
        timestamp(),
        sender,
        text
    )
}

/// Hand one line to one session's outbound queue.
pub fn send_one(outbox: &Outbox, line: String) {
    if let Err(e) = outbox.try_send(line) {
        error!("dropping outbound line: {}", e);
    }
}

/// Hand a batch of deliveries to their queues.
pub fn send_all(deliveries: Vec<Delivery>) {
    for delivery in deliveries {
        send_one(&delivery.to, delivery.line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_line_format() {
        let line = broadcast_line("alice", "hi there");
        assert!(line.contains(" > alice :: hi there"));
        // timestamp prefix is HH:MM:SS
        assert_eq!(line.split(' ').next().unwrap().len(), 8);
    }

    #[test]
    fn test_private_line_carries_marker() {
        let line = private_line("alice", "psst");
        assert!(line.contains("*** PRIVATE MESSAGE ***"));
        assert!(line.contains("alice :: psst"));
    }

    #[tokio::test]
    async fn test_send_one_delivers() {
        let (tx, mut rx) = mpsc::channel(4);
        send_one(&tx, "hello".to_string());
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_send_one_full_queue_drops_without_blocking() {
        let (tx, _rx) = mpsc::channel(1);
        send_one(&tx, "first".to_string());
        // Queue is full; this must return immediately.
        send_one(&tx, "second".to_string());
    }

    #[tokio::test]
    async fn test_send_all_continues_past_closed_recipient() {
        let (dead_tx, dead_rx) = mpsc::channel(1);
        drop(dead_rx);
        let (live_tx, mut live_rx) = mpsc::channel(4);

        send_all(vec![
            Delivery {
                to: dead_tx,
                line: "lost".to_string(),
            },
            Delivery {
                to: live_tx,
                line: "kept".to_string(),
            },
        ]);

        assert_eq!(live_rx.recv().await, Some("kept".to_string()));
    }
}
