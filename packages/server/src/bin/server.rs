//! Messaging server binary.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=... cargo run --bin venturechat-server -- --port 3000
//! ```

use clap::Parser;
use venturechat_server::ServerConfig;
use venturechat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = venturechat_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
