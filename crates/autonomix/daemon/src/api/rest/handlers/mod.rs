//! API request handlers

mod admin;
mod agents;
mod events;
mod health;
mod interfaces;
mod owners;
mod roles;

pub use admin::*;
pub use agents::*;
pub use events::*;
pub use health::*;
pub use interfaces::*;
pub use owners::*;
pub use roles::*;
