//! Role management commands

use crate::client::AutonomixClient;
use crate::error::CliResult;
use crate::output::{self, print_success, OutputFormat};
use autonomix_types::{Principal, Role};
use clap::Subcommand;

/// Role subcommands
#[derive(Subcommand)]
pub enum RoleCommands {
    /// Grant a role to an account
    Grant {
        /// Role name
        role: String,
        /// Account receiving the role
        account: Principal,
    },

    /// Revoke a role from an account
    Revoke {
        /// Role name
        role: String,
        /// Account losing the role
        account: Principal,
    },

    /// Give up a role held by the caller
    Renounce {
        /// Role name
        role: String,
    },

    /// Check whether an account holds a role
    Check {
        /// Role name
        role: String,
        /// Account to check
        account: Principal,
    },

    /// List the holders of a role
    Members {
        /// Role name
        #[arg(default_value = Role::ADMIN_NAME)]
        role: String,
    },
}

/// Execute a role command
pub async fn execute(
    command: RoleCommands,
    client: &AutonomixClient,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        RoleCommands::Grant { role, account } => {
            client.caller()?;
            let role = Role::new(role);
            client.grant_role(&role, account).await?;
            print_success(&format!("Granted {} to {}", role, account));
        }
        RoleCommands::Revoke { role, account } => {
            client.caller()?;
            let role = Role::new(role);
            client.revoke_role(&role, account).await?;
            print_success(&format!("Revoked {} from {}", role, account));
        }
        RoleCommands::Renounce { role } => {
            let caller = client.caller()?;
            let role = Role::new(role);
            client.renounce_role(&role, caller).await?;
            print_success(&format!("Renounced {}", role));
        }
        RoleCommands::Check { role, account } => {
            let check = client.check_role(&Role::new(role), account).await?;
            output::print_single(&check, format);
        }
        RoleCommands::Members { role } => {
            let members = client.role_members(&Role::new(role)).await?;
            output::print_single(&members, format);
        }
    }
    Ok(())
}
