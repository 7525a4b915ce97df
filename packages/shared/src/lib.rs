//! Shared utilities for the VentureChat server and client binaries.

pub mod logger;
pub mod time;
