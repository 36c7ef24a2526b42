//! CLI command implementations

pub mod admin;
pub mod agent;
pub mod events;
pub mod interface;
pub mod role;
