//! Configuration management for the SSRS client workspace.
//!
//! This crate provides types and loaders for report server connection
//! configuration from environment variables and `.env` files.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader};
pub use types::{AuthConfig, AuthStrategy, Config, ConnectionConfig, ServerParts};
