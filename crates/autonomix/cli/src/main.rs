//! AutonomiX CLI - Command-line interface for the agent registry
//!
//! This CLI gives operators a terminal interface to:
//! - Register agents and maintain their endpoints and metadata
//! - Adjust reputation, transfer and burn agent tokens
//! - Manage roles and pause registration
//! - Inspect supported interfaces and follow registry events

use autonomix_types::Principal;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod commands;
mod config;
mod error;
mod output;

use commands::{admin, agent, events, interface, role};
use config::CliConfig;
use error::CliResult;
use output::print_error;

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// AutonomiX CLI application
#[derive(Parser)]
#[command(name = "autonomix")]
#[command(about = "AutonomiX - Agent registry CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "AUTONOMIX_CLI_CONFIG", global = true)]
    config: Option<String>,

    /// Daemon endpoint
    #[arg(short, long, env = "AUTONOMIX_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Principal to act as (sent as X-Caller)
    #[arg(long, env = "AUTONOMIX_CALLER", global = true)]
    caller: Option<Principal>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table", global = true)]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Manage agent tokens
    Agent {
        #[command(subcommand)]
        command: agent::AgentCommands,
    },

    /// Pause control
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },

    /// Role management
    Role {
        #[command(subcommand)]
        command: role::RoleCommands,
    },

    /// Interface introspection
    #[command(alias = "iface")]
    Interface {
        #[command(subcommand)]
        command: interface::InterfaceCommands,
    },

    /// Follow live registry events
    Events {
        /// Only show events of this kind, e.g. ReputationUpdated
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Show configuration
    Config,

    /// Check daemon connectivity
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;
    let endpoint = cli
        .endpoint
        .or_else(|| config.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let caller = cli.caller.or(config.caller);

    tracing::debug!(endpoint = %endpoint, caller = ?caller, "Resolved CLI settings");

    let client = client::AutonomixClient::new(&endpoint, caller)?;

    match cli.command {
        Commands::Agent { command } => agent::execute(command, &client, cli.output).await,
        Commands::Admin { command } => admin::execute(command, &client, cli.output).await,
        Commands::Role { command } => role::execute(command, &client, cli.output).await,
        Commands::Interface { command } => {
            interface::execute(command, &client, cli.output).await
        }
        Commands::Events { kind } => {
            let json = !matches!(cli.output, output::OutputFormat::Table);
            events::follow(&client, kind, json).await
        }
        Commands::Config => {
            println!("Endpoint: {}", endpoint);
            match caller {
                Some(caller) => println!("Caller: {}", caller),
                None => println!("Caller: (none)"),
            }
            if let Some(path) = CliConfig::default_path() {
                println!("Config file: {}", path.display());
            }
            Ok(())
        }
        Commands::Status => match client.health_check().await {
            Ok(health) => {
                output::print_success(&format!("AutonomiX daemon is {}", health.status));
                println!("  Version: {}", health.version);
                println!("  Uptime: {}", health.uptime);
                let status = client.daemon_status().await?;
                if let Some(registry) = status.get("registry") {
                    output::print_single(registry, cli.output);
                }
                Ok(())
            }
            Err(e) => Err(error::CliError::Config(format!(
                "Cannot connect to AutonomiX daemon at {}: {}",
                endpoint, e
            ))),
        },
    }
}
