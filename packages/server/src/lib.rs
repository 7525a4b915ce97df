//! Real-time messaging server for the investor/entrepreneur platform.
//!
//! Two paths carry every message: the durable path (HTTP, persisted by the
//! conversation store) and the live path (WebSocket, relayed to the peer's
//! open connections by the broadcaster). Neither waits on the other.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod realtime;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{build_app, build_state, run as run_server};
