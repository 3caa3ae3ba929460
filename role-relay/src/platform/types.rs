//! Wire types for the Discord interaction webhook and REST API.
//!
//! This module defines the message formats for:
//! - Interaction webhook requests and responses
//! - OAuth2 token exchange
//! - Current user identity
//! - Application role-connection metadata

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OAuth2 scopes requested for Linked Roles.
pub const LINKED_ROLES_SCOPE: &str = "identify role_connections.write";

/// Discriminator shown for accounts that no longer carry one.
pub const DEFAULT_DISCRIMINATOR: &str = "0";

// =============================================================================
// Interaction Types
// =============================================================================

/// Interaction type of a liveness ping.
pub const INTERACTION_PING: i64 = 1;

/// Response type acknowledging a ping.
pub const RESPONSE_PONG: i64 = 1;

/// Response type replying with a channel message.
pub const RESPONSE_CHANNEL_MESSAGE: i64 = 4;

/// Incoming interaction. Only the type is inspected, everything else is ignored.
///
/// The type is kept as raw JSON: any body that parses is answered, and only a
/// numeric `1` counts as a ping.
#[derive(Debug, Clone)]
pub struct InteractionPayload {
    pub kind: Option<Value>,
}

impl InteractionPayload {
    /// Parse a request body. Fails only when the bytes are not JSON.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self {
            kind: value.get("type").cloned(),
        })
    }

    /// Whether this interaction is the platform's endpoint liveness check.
    pub fn is_ping(&self) -> bool {
        self.kind.as_ref().and_then(Value::as_f64) == Some(INTERACTION_PING as f64)
    }
}

/// Reply to an interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

/// Message body of a channel-message reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageData {
    pub content: String,
}

impl InteractionResponse {
    /// Acknowledge a ping.
    pub fn pong() -> Self {
        Self {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    /// Reply to a command with a plain message.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(MessageData {
                content: content.into(),
            }),
        }
    }
}

// =============================================================================
// OAuth2 Types
// =============================================================================

/// Credentials needed to exchange an authorization code.
pub struct OAuthCredentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
}

/// Token endpoint response.
#[derive(Clone, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("scope", &self.scope)
            .finish()
    }
}

// =============================================================================
// User and Role Connection Types
// =============================================================================

/// The authorized user, as returned by `GET /users/@me`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
}

impl UserIdentity {
    /// `username#discriminator`, with the discriminator defaulting to `0`.
    pub fn tag(&self) -> String {
        format!(
            "{}#{}",
            self.username,
            self.discriminator.as_deref().unwrap_or(DEFAULT_DISCRIMINATOR)
        )
    }
}

/// Body of `PUT /users/@me/applications/{client_id}/role-connection`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleConnectionMetadata {
    pub platform_name: String,
    pub platform_username: String,
    pub metadata: RoleMetadata,
}

/// Metadata values. Keys must match the schema registered for the application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleMetadata {
    pub verified: i64,
}

impl RoleConnectionMetadata {
    /// Metadata marking `user` as verified on `platform_name`.
    pub fn verified(platform_name: &str, user: &UserIdentity) -> Self {
        Self {
            platform_name: platform_name.to_string(),
            platform_username: user.username.clone(),
            metadata: RoleMetadata { verified: 1 },
        }
    }
}
