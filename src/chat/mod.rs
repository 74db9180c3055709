//! Chat core: command parsing and dispatch, the room registry, and the
//! broadcast/delivery engine.

pub mod command;
pub mod delivery;
pub mod dispatch;
pub mod messages;
pub mod registry;

pub use command::{parse, Command, Input};
pub use delivery::{Delivery, Outbox, OUTBOX_CAPACITY};
pub use dispatch::{Context, Control};
pub use registry::{Registry, UserId};
