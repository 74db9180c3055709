//! parley - a multi-room text chat server over raw TCP.
//!
//! Clients connect with any line-oriented client (telnet, nc), claim a
//! display name with `/login`, and join chatrooms to talk. Commands start
//! with `/`; everything else is chat text for the active room.

pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod server;

pub use chat::{Context, Registry};
pub use config::Config;
pub use error::{ParleyError, Result};
pub use lookup::IpLookup;
pub use server::ChatListener;
