//! Discord platform module.
//!
//! This module provides:
//! - Wire types for interactions, OAuth2 and role connections
//! - An async REST client for the Linked Roles calls
//!
//! ## Linked Roles Flow
//!
//! ```text
//! authorize → oauth2/token → users/@me → users/@me/applications/{id}/role-connection
//! ```

pub mod client;
pub mod types;

pub use client::{ApiError, PlatformClient};
pub use types::{
    InteractionPayload, InteractionResponse, OAuthCredentials, OAuthToken,
    RoleConnectionMetadata, UserIdentity, LINKED_ROLES_SCOPE,
};
