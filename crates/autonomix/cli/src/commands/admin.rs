//! Pause control commands

use crate::client::AutonomixClient;
use crate::error::CliResult;
use crate::output::{self, print_success, OutputFormat};
use clap::Subcommand;

/// Admin subcommands
#[derive(Subcommand)]
pub enum AdminCommands {
    /// Halt registration
    Pause,

    /// Resume registration
    Unpause,

    /// Show whether registration is paused
    Status,
}

/// Execute an admin command
pub async fn execute(
    command: AdminCommands,
    client: &AutonomixClient,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        AdminCommands::Pause => {
            client.caller()?;
            client.pause().await?;
            print_success("Registry paused");
        }
        AdminCommands::Unpause => {
            client.caller()?;
            client.unpause().await?;
            print_success("Registry unpaused");
        }
        AdminCommands::Status => {
            let status = client.paused().await?;
            output::print_single(&status, format);
        }
    }
    Ok(())
}
