//! Agent token commands

use crate::client::{AgentDetails, AutonomixClient};
use crate::error::{CliError, CliResult};
use crate::output::{self, print_error, print_info, print_success, OutputFormat};
use autonomix_types::{AgentId, Principal, ReputationDelta};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

/// Agent subcommands
#[derive(Subcommand)]
pub enum AgentCommands {
    /// Mint a new agent token (admin only)
    Register {
        /// Recipient; defaults to the caller
        #[arg(long)]
        to: Option<Principal>,

        /// Service endpoint (http:// or https://)
        #[arg(short, long)]
        endpoint: String,

        /// Metadata reference (ipfs://, http:// or https://)
        #[arg(short, long)]
        metadata: String,
    },

    /// Get an agent's record
    Get {
        /// Agent ID
        id: AgentId,

        /// Skip metadata resolution
        #[arg(long)]
        no_resolve: bool,
    },

    /// List live agents
    List {
        /// Skip metadata resolution
        #[arg(long)]
        no_resolve: bool,
    },

    /// Show an agent with its full metadata document
    Show {
        /// Agent ID
        id: AgentId,
    },

    /// Overwrite endpoint and metadata reference (owner or admin)
    SetMetadata {
        /// Agent ID
        id: AgentId,

        /// New service endpoint
        #[arg(short, long)]
        endpoint: String,

        /// New metadata reference
        #[arg(short, long)]
        metadata: String,
    },

    /// Apply a signed reputation delta
    Reputation {
        /// Agent ID
        id: AgentId,

        /// Signed delta, e.g. 10 or -5
        #[arg(allow_hyphen_values = true)]
        delta: ReputationDelta,
    },

    /// Destroy an agent token (owner or admin)
    Burn {
        /// Agent ID
        id: AgentId,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Transfer an agent token
    Transfer {
        /// Agent ID
        id: AgentId,

        /// New owner
        to: Principal,

        /// Current owner; defaults to the caller
        #[arg(long)]
        from: Option<Principal>,
    },

    /// Show the owner of an agent, or the agents an owner holds
    Owner {
        /// Agent ID
        #[arg(required_unless_present = "of")]
        id: Option<AgentId>,

        /// List agents held by this principal instead
        #[arg(long, conflicts_with = "id")]
        of: Option<Principal>,
    },
}

/// Table row for agent display
#[derive(Debug, Serialize, Tabled)]
struct AgentRow {
    id: u64,
    owner: String,
    reputation: String,
    name: String,
    endpoint: String,
}

impl From<AgentDetails> for AgentRow {
    fn from(agent: AgentDetails) -> Self {
        Self {
            id: agent.id,
            owner: agent.owner.to_string(),
            reputation: agent.reputation,
            name: agent.name.unwrap_or_else(|| "-".to_string()),
            endpoint: agent.endpoint,
        }
    }
}

fn has_scheme(value: &str, scheme: &str) -> bool {
    value
        .get(..scheme.len())
        .map(|prefix| prefix.eq_ignore_ascii_case(scheme))
        .unwrap_or(false)
}

/// Endpoints must be absolute web URLs
pub fn validate_endpoint(endpoint: &str) -> CliResult<()> {
    if has_scheme(endpoint, "http://") || has_scheme(endpoint, "https://") {
        Ok(())
    } else {
        Err(CliError::InvalidArgument(format!(
            "endpoint must start with http:// or https://: {}",
            endpoint
        )))
    }
}

/// Metadata references must be IPFS or web URLs
pub fn validate_metadata_uri(uri: &str) -> CliResult<()> {
    if has_scheme(uri, "ipfs://") || has_scheme(uri, "http://") || has_scheme(uri, "https://") {
        Ok(())
    } else {
        Err(CliError::InvalidArgument(format!(
            "metadata URI must start with ipfs://, http:// or https://: {}",
            uri
        )))
    }
}

/// Recipient of a registration: explicit `to`, else the caller, never zero
pub fn resolve_recipient(to: Option<Principal>, caller: Principal) -> CliResult<Principal> {
    let recipient = to.unwrap_or(caller);
    if recipient.is_zero() {
        return Err(CliError::InvalidArgument(
            "recipient must not be the zero principal".to_string(),
        ));
    }
    Ok(recipient)
}

/// Execute an agent command
pub async fn execute(
    command: AgentCommands,
    client: &AutonomixClient,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        AgentCommands::Register {
            to,
            endpoint,
            metadata,
        } => {
            validate_endpoint(&endpoint)?;
            validate_metadata_uri(&metadata)?;
            let recipient = resolve_recipient(to, client.caller()?)?;

            print_info(&format!("Registering agent for {}...", recipient));
            let registered = client
                .register_agent(recipient, &endpoint, &metadata)
                .await?;
            print_success(&format!(
                "Registered agent #{} owned by {}",
                registered.id, registered.owner
            ));
            Ok(())
        }

        AgentCommands::Get { id, no_resolve } => {
            let agent = client.get_agent(id.get(), !no_resolve).await?;
            output::print_single(&agent, format);
            Ok(())
        }

        AgentCommands::List { no_resolve } => {
            let list = client.list_agents(!no_resolve).await?;
            match format {
                OutputFormat::Table => {
                    let rows: Vec<AgentRow> = list.items.into_iter().map(AgentRow::from).collect();
                    output::print_output(rows, format);
                    println!(
                        "Total supply: {}  Next id: {}",
                        list.total_supply, list.next_id
                    );
                }
                _ => output::print_single(&list, format),
            }
            Ok(())
        }

        AgentCommands::Show { id } => {
            let agent = client.get_agent(id.get(), true).await?;
            let metadata = client.get_agent_metadata(id.get()).await.ok();
            output::print_single(
                &serde_json::json!({ "agent": agent, "metadata": metadata }),
                format,
            );
            Ok(())
        }

        AgentCommands::SetMetadata {
            id,
            endpoint,
            metadata,
        } => {
            client.caller()?;
            let agent = client
                .set_agent_metadata(id.get(), &endpoint, &metadata)
                .await?;
            print_success(&format!("Updated metadata of agent #{}", agent.id));
            Ok(())
        }

        AgentCommands::Reputation { id, delta } => {
            client.caller()?;
            let update = client.update_reputation(id.get(), delta).await?;
            print_success(&format!(
                "Agent #{} reputation is now {}",
                update.id, update.reputation
            ));
            Ok(())
        }

        AgentCommands::Burn { id, yes } => {
            client.caller()?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Burn agent #{}? The id will never be reused.",
                        id
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirm {
                    print_error("Aborted");
                    return Ok(());
                }
            }

            client.burn_agent(id.get()).await?;
            print_success(&format!("Burned agent #{}", id));
            Ok(())
        }

        AgentCommands::Transfer { id, to, from } => {
            client.caller()?;
            let owner = client.transfer_agent(id.get(), from, to).await?;
            print_success(&format!("Agent #{} now owned by {}", owner.id, owner.owner));
            Ok(())
        }

        AgentCommands::Owner { id, of } => {
            match (id, of) {
                (_, Some(owner)) => {
                    let owned = client.owner_agents(owner).await?;
                    output::print_single(&owned, format);
                }
                (Some(id), None) => {
                    let owner = client.owner_of(id.get()).await?;
                    output::print_single(&owner, format);
                }
                (None, None) => {
                    return Err(CliError::InvalidArgument(
                        "pass an agent id or --of <principal>".to_string(),
                    ))
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(last: u8) -> Principal {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Principal::from_bytes(bytes)
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("https://agent.example").is_ok());
        assert!(validate_endpoint("HTTP://agent.example").is_ok());
        assert!(validate_endpoint("ftp://agent.example").is_err());
        assert!(validate_endpoint("").is_err());
    }

    #[test]
    fn test_validate_metadata_uri() {
        assert!(validate_metadata_uri("ipfs://QmHash").is_ok());
        assert!(validate_metadata_uri("https://meta.example/1.json").is_ok());
        assert!(validate_metadata_uri("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_resolve_recipient() {
        let caller = principal(1);
        assert_eq!(resolve_recipient(None, caller).unwrap(), caller);
        assert_eq!(resolve_recipient(Some(principal(2)), caller).unwrap(), principal(2));
        assert!(resolve_recipient(Some(Principal::ZERO), caller).is_err());
    }
}
