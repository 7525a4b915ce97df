//! Terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin venturechat-client -- --token <jwt> --user-id investor-1 --peer-id founder-1
//! ```

use clap::Parser;
use venturechat_client::ClientConfig;
use venturechat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ClientConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = venturechat_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
