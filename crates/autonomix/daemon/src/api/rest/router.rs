//! API Router configuration

use super::handlers;
use super::rate_limit::{client_limiter, rate_limit, ClientRateLimiter};
use super::state::AppState;
use crate::config::ServerConfig;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the main API router, building its own limiter from
/// `rate_limit_per_min`
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    build_router(state, config, client_limiter(config.rate_limit_per_min))
}

/// Create the main API router around a caller-owned limiter
pub fn build_router(
    state: AppState,
    config: &ServerConfig,
    limiter: Option<Arc<ClientRateLimiter>>,
) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Agents
        .route(
            "/agents",
            get(handlers::list_agents).post(handlers::register_agent),
        )
        .route(
            "/agents/:id",
            get(handlers::get_agent).delete(handlers::burn_agent),
        )
        .route(
            "/agents/:id/metadata",
            get(handlers::get_agent_metadata).put(handlers::set_agent_metadata),
        )
        .route("/agents/:id/reputation", post(handlers::update_reputation))
        .route("/agents/:id/owner", get(handlers::get_owner))
        .route("/agents/:id/exists", get(handlers::agent_exists))
        .route("/agents/:id/transfer", post(handlers::transfer_agent))
        .route(
            "/agents/:id/approval",
            get(handlers::get_approved).put(handlers::approve_agent),
        )
        // Owners
        .route("/owners/:owner/balance", get(handlers::owner_balance))
        .route("/owners/:owner/agents", get(handlers::owner_agents))
        .route("/operators", post(handlers::set_operator))
        .route("/operators/:owner/:operator", get(handlers::get_operator))
        // Admin
        .route("/admin/paused", get(handlers::get_paused))
        .route("/admin/pause", post(handlers::pause))
        .route("/admin/unpause", post(handlers::unpause))
        // Roles
        .route("/roles/grant", post(handlers::grant_role))
        .route("/roles/revoke", post(handlers::revoke_role))
        .route("/roles/renounce", post(handlers::renounce_role))
        .route("/roles/:role/members", get(handlers::role_members))
        .route("/roles/:role/:account", get(handlers::check_role))
        // Interfaces
        .route("/interfaces", get(handlers::list_interfaces))
        .route("/interfaces/:id", get(handlers::supports_interface))
        // Events
        .route("/events/stream", get(handlers::stream_events));

    let api_routes = match limiter {
        Some(limiter) => {
            api_routes.route_layer(middleware::from_fn_with_state(limiter, rate_limit))
        }
        None => api_routes,
    };

    let mut router = Router::new().nest("/api/v1", api_routes);

    if let Some(dir) = &config.static_dir {
        router = router
            .nest_service("/metadata", ServeDir::new(dir.join("metadata")))
            .nest_service("/images", ServeDir::new(dir.join("images")));
    }

    let router = router
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(TraceLayer::new_for_http());

    let router = if config.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
