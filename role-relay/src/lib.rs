//! Role Relay - Discord interactions and Linked Roles relay.
//!
//! This library provides the modules behind the `role-relay` binary:
//! - `web`: Interaction webhook and Linked Roles OAuth2 handlers
//! - `platform`: Discord wire types and REST client
//! - `config`: Environment configuration
//!
//! ## Architecture
//!
//! ```text
//! Discord → /api/interactions → verify → pong / message
//! Browser → /api/linked-roles → authorize → token → users/@me → role-connection
//! ```

pub mod config;
pub mod platform;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use platform::{ApiError, PlatformClient};
pub use web::{router, AppState};
