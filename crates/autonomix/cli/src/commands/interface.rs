//! Capability introspection commands

use crate::client::{AutonomixClient, InterfaceInfo};
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use autonomix_types::InterfaceId;
use clap::Subcommand;
use colored::*;
use serde::Serialize;
use tabled::Tabled;

/// Interface subcommands
#[derive(Subcommand)]
pub enum InterfaceCommands {
    /// Check whether the registry supports an interface id
    Check {
        /// Four-byte id, e.g. 0x80ac58cd
        id: InterfaceId,
    },

    /// List supported interfaces
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct InterfaceRow {
    name: String,
    version: u32,
    id: String,
    operations: usize,
}

impl From<InterfaceInfo> for InterfaceRow {
    fn from(info: InterfaceInfo) -> Self {
        Self {
            name: info.name,
            version: info.version,
            id: info.interface_id.to_string(),
            operations: info.signatures.len(),
        }
    }
}

/// Execute an interface command
pub async fn execute(
    command: InterfaceCommands,
    client: &AutonomixClient,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        InterfaceCommands::Check { id } => {
            let support = client.supports_interface(id).await?;
            match format {
                OutputFormat::Table => {
                    if support.supported {
                        println!("{} {} is supported", "✓".green(), support.interface_id);
                    } else {
                        println!("{} {} is not supported", "✗".red(), support.interface_id);
                    }
                }
                _ => output::print_single(&support, format),
            }
        }
        InterfaceCommands::List => {
            let interfaces = client.list_interfaces().await?;
            match format {
                OutputFormat::Table => {
                    let rows = interfaces.into_iter().map(InterfaceRow::from).collect();
                    output::print_output::<InterfaceRow>(rows, format);
                }
                _ => output::print_single(&interfaces, format),
            }
        }
    }
    Ok(())
}
