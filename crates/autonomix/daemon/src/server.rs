//! Server setup and lifecycle management

use crate::api::build_router;
use crate::api::rest::rate_limit::{client_limiter, spawn_pruner, PRUNE_INTERVAL};
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::resolver::MetadataResolver;
use autonomix_registry::AgentRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// AutonomiX registry daemon
pub struct Server {
    config: DaemonConfig,
    registry: Arc<AgentRegistry>,
    resolver: Arc<MetadataResolver>,
}

impl Server {
    /// Build the registry and resolver from configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let admin = config.registry.admin.ok_or_else(|| {
            DaemonError::Config(
                "registry.admin must be set (AUTONOMIX_REGISTRY__ADMIN or --admin)".to_string(),
            )
        })?;

        let registry = Arc::new(AgentRegistry::with_config(
            admin,
            config.registry.options.clone(),
        )?);

        let resolver = MetadataResolver::from_config(
            config.resolver.clone(),
            config.server.static_dir.clone(),
        )
        .map_err(|e| DaemonError::Config(format!("Failed to build metadata resolver: {}", e)))?;

        Ok(Self {
            config,
            registry,
            resolver: Arc::new(resolver),
        })
    }

    /// Shared registry handle
    pub fn registry(&self) -> Arc<AgentRegistry> {
        self.registry.clone()
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let listener = TcpListener::bind(addr).await?;

        let state = AppState::new(self.registry.clone(), self.resolver.clone());
        let limiter = client_limiter(self.config.server.rate_limit_per_min);
        let pruner = limiter
            .clone()
            .map(|limiter| spawn_pruner(limiter, PRUNE_INTERVAL));
        let app = build_router(state, &self.config.server, limiter);

        tracing::info!("AutonomiX daemon listening on {}", addr);
        tracing::info!(
            name = self.registry.name(),
            symbol = self.registry.symbol(),
            "Registry ready"
        );

        let served = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DaemonError::Server(e.to_string()));

        if let Some(pruner) = pruner {
            pruner.abort();
        }
        served?;

        tracing::info!("AutonomiX daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
