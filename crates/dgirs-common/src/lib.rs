//! dgirs-common — Shared errors, configuration and the sandboxed HTTP client
//! used across all dgirs crates.

pub mod config;
pub mod error;
pub mod sandbox;

pub use config::Config;
pub use error::{ApiError, DgiError, Result};
pub use sandbox::SandboxClient;
