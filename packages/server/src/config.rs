//! Server configuration from command-line flags and environment.

use std::path::PathBuf;

use clap::Parser;

/// Real-time messaging server for the investor/entrepreneur platform
#[derive(Debug, Clone, Parser)]
#[command(name = "venturechat-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "VENTURECHAT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// HS256 secret shared with the platform's token issuer
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Append-only JSON Lines file for conversations; in-memory when omitted
    #[arg(long, env = "VENTURECHAT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
