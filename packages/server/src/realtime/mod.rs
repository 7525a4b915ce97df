//! Realtime broadcaster: the live path.
//!
//! A single task owns the room membership table and the connection table.
//! Every other component talks to it through a cloneable
//! [`BroadcasterHandle`], which turns calls into commands on one FIFO
//! channel. Commands are applied in arrival order, one at a time.

mod broadcaster;
mod handle;

pub use broadcaster::Broadcaster;
pub use handle::{BroadcasterHandle, BroadcasterStats};
