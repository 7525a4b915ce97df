//! HTTP and WebSocket server implementation.

pub mod error;
pub mod extractor;
mod handler;
mod router;
mod runner;
mod signal;
pub mod state;

pub use router::build_app;
pub use runner::{build_state, run};
