//! QIR compilation relay daemon.
//!
//! The daemon exposes:
//! - `POST /api/compile` — stage a QIR program, run the external `qat`
//!   optimizer against the hardware-specific decomposition profile, return
//!   the compiled bitcode
//! - `GET|POST|PUT /api/proxy` — whitelisted header/body pass-through to a
//!   caller-specified upstream
//! - `GET /api/health`, `GET /api/status` — liveness and resolved toolchain

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod server;

use config::DaemonConfig;
use error::{DaemonError, DaemonResult};
use server::Server;

/// Relay daemon CLI
#[derive(Parser)]
#[command(name = "qir-relayd")]
#[command(about = "QIR compilation relay daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QIR_RELAY_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "QIR_RELAY_LISTEN_ADDR")]
    listen: Option<String>,

    /// Path to the qat executable
    #[arg(long, env = "QIR_RELAY_QAT_PATH")]
    qat_path: Option<PathBuf>,

    /// Directory holding the decomposition profiles
    #[arg(long, env = "QIR_RELAY_PROFILE_DIR")]
    profile_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "QIR_RELAY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "QIR_RELAY_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config =
        DaemonConfig::load(cli.config.as_deref()).map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(path) = cli.qat_path {
        config.toolchain.qat_path = Some(path);
    }
    if let Some(dir) = cli.profile_dir {
        config.toolchain.profile_dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Print startup banner
    println!(
        r#"
   ___  ___ ____    ____     _
  / _ \|_ _|  _ \  |  _ \ ___| | __ _ _   _
 | | | || || |_) | | |_) / _ \ |/ _` | | | |
 | |_| || ||  _ <  |  _ <  __/ | (_| | |_| |
  \__\_\___|_| \_\ |_| \_\___|_|\__,_|\__, |
                                      |___/
  QIR compilation relay
  Version: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
