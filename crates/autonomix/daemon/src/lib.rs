//! AutonomiX daemon library
//!
//! This crate exposes the agent registry over HTTP:
//! - REST API handlers for registry operations
//! - Server-sent event stream of registry events
//! - Off-chain metadata and image resolution
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod resolver;
pub mod server;

pub use api::{build_router, create_router};
pub use api::rest::state::AppState;
pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError};
pub use resolver::MetadataResolver;
pub use server::Server;
