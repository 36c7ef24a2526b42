//! Event streaming commands

use crate::client::AutonomixClient;
use crate::error::CliResult;
use crate::output::print_info;
use autonomix_types::{RegistryEvent, RegistryEventEnvelope};
use colored::*;
use futures_util::StreamExt;

/// Follow live registry events, optionally filtered by event kind
pub async fn follow(client: &AutonomixClient, kind: Option<String>, json: bool) -> CliResult<()> {
    print_info("Watching events... (Ctrl+C to stop)");
    println!();

    let stream = client.stream_events().await?;
    futures_util::pin_mut!(stream);

    while let Some(result) = stream.next().await {
        match result {
            Ok(envelope) => {
                let matches = kind
                    .as_deref()
                    .map(|k| envelope.event.kind().eq_ignore_ascii_case(k))
                    .unwrap_or(true);
                if !matches {
                    continue;
                }
                if json {
                    println!("{}", serde_json::to_string(&envelope)?);
                } else {
                    print_event(&envelope);
                }
            }
            Err(e) => {
                eprintln!("{} Stream error: {}", "✗".red(), e);
            }
        }
    }

    Ok(())
}

fn describe(event: &RegistryEvent) -> String {
    match event {
        RegistryEvent::AgentRegistered {
            agent_id, owner, ..
        } => format!("agent #{} registered to {}", agent_id, owner),
        RegistryEvent::AgentMetadataUpdated {
            agent_id,
            endpoint,
            metadata_uri,
        } => format!("agent #{} -> {} ({})", agent_id, endpoint, metadata_uri),
        RegistryEvent::ReputationUpdated {
            agent_id,
            old_reputation,
            new_reputation,
            delta,
        } => format!(
            "agent #{} reputation {} -> {} (delta {})",
            agent_id, old_reputation, new_reputation, delta
        ),
        RegistryEvent::AgentBurned { agent_id, owner } => {
            format!("agent #{} burned (owner {})", agent_id, owner)
        }
        RegistryEvent::Transfer { agent_id, from, to } => {
            format!("agent #{} {} -> {}", agent_id, from, to)
        }
        RegistryEvent::Approval {
            agent_id, approved, ..
        } => match approved {
            Some(approved) => format!("agent #{} approved for {}", agent_id, approved),
            None => format!("agent #{} approval cleared", agent_id),
        },
        RegistryEvent::ApprovalForAll {
            owner,
            operator,
            approved,
        } => format!("operator {} for {}: {}", operator, owner, approved),
        RegistryEvent::Paused { account } => format!("paused by {}", account),
        RegistryEvent::Unpaused { account } => format!("unpaused by {}", account),
        RegistryEvent::RoleGranted { role, account, .. } => {
            format!("{} granted to {}", role, account)
        }
        RegistryEvent::RoleRevoked { role, account, .. } => {
            format!("{} revoked from {}", role, account)
        }
    }
}

fn print_event(envelope: &RegistryEventEnvelope) {
    let kind = envelope.event.kind();
    let colored_kind = match &envelope.event {
        RegistryEvent::AgentBurned { .. } | RegistryEvent::RoleRevoked { .. } => kind.red(),
        RegistryEvent::Paused { .. } | RegistryEvent::Unpaused { .. } => kind.yellow(),
        RegistryEvent::AgentRegistered { .. } | RegistryEvent::RoleGranted { .. } => kind.green(),
        _ => kind.blue(),
    };

    println!(
        "{} {} {} {}",
        envelope.timestamp.format("%H:%M:%S").to_string().dimmed(),
        format!("#{}", envelope.sequence).dimmed(),
        colored_kind,
        describe(&envelope.event)
    );
}
