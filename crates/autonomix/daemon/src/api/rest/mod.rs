//! REST API implementation

pub mod caller;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod state;
