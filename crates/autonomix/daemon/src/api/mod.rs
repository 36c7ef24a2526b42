//! API layer for autonomixd

pub mod rest;

pub use rest::router::{build_router, create_router};
