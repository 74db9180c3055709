//! Transport layer: TCP listener, per-connection sessions, wire codec.

pub mod codec;
mod listener;
pub mod session;

pub use codec::{encode, ChunkReader};
pub use listener::{ChatListener, ConnectionPermit};
