//! AutonomiX Daemon - agent registry service
//!
//! The daemon provides:
//! - REST API for agent registration, metadata, reputation and ownership
//! - Role management and pause control
//! - Event streaming for indexers and dashboards

use autonomix_daemon::error::{DaemonError, DaemonResult};
use autonomix_daemon::{DaemonConfig, Server};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// AutonomiX Daemon CLI
#[derive(Parser)]
#[command(name = "autonomixd")]
#[command(about = "AutonomiX Daemon - Agent registry service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "AUTONOMIX_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "AUTONOMIX_LISTEN_ADDR")]
    listen: Option<String>,

    /// Principal granted the admin role at startup
    #[arg(short, long, env = "AUTONOMIX_ADMIN")]
    admin: Option<String>,

    /// Directory holding metadata/ and images/ to serve
    #[arg(long, env = "AUTONOMIX_STATIC_DIR")]
    static_dir: Option<String>,

    /// Log level
    #[arg(long, env = "AUTONOMIX_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "AUTONOMIX_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(admin) = &cli.admin {
        config.registry.admin = Some(
            admin
                .parse()
                .map_err(|e| DaemonError::Config(format!("Invalid admin principal: {}", e)))?,
        );
    }
    if let Some(dir) = &cli.static_dir {
        config.server.static_dir = Some(dir.into());
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

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
     _         _                             _ __  __
    / \  _   _| |_ ___  _ __   ___  _ __ ___ (_)\ \/ /
   / _ \| | | | __/ _ \| '_ \ / _ \| '_ ` _ \| | \  /
  / ___ \ |_| | || (_) | | | | (_) | | | | | | | /  \
 /_/   \_\__,_|\__\___/|_| |_|\___/|_| |_| |_|_|/_/\_\

  AutonomiX - Agent Registry
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
