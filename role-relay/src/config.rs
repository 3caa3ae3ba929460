//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and handed to every handler through
//! [`crate::web::AppState`]. Handlers never read the environment themselves.

use std::env;
use tracing::warn;

/// Default Discord REST API base.
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api";

/// Default `platform_name` pushed with role-connection metadata.
pub const DEFAULT_PLATFORM_NAME: &str = "MyApp";

/// Default content of the reply to a command interaction.
pub const DEFAULT_INTERACTION_REPLY: &str = "Hello from the role-relay interactions endpoint!";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Application public key (hex) used to verify interaction signatures
    pub public_key: String,

    /// OAuth2 client id
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// OAuth2 redirect URI, must match the one registered with the platform
    pub redirect_uri: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Base URL of the platform REST API
    pub api_base_url: String,

    /// Name shown on the user's profile next to the linked account
    pub platform_name: String,

    /// Content of the canned reply to command interactions
    pub interaction_reply: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// Missing required values are left empty and reported once, so a
    /// misconfigured deployment still starts and fails at the remote API.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| lookup(name).unwrap_or_default();
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = Config {
            public_key: required("PUBLIC_KEY"),
            client_id: required("CLIENT_ID"),
            client_secret: required("CLIENT_SECRET"),
            redirect_uri: required("REDIRECT_URI"),

            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            api_base_url: non_empty("API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),

            platform_name: non_empty("PLATFORM_NAME")
                .unwrap_or_else(|| DEFAULT_PLATFORM_NAME.to_string()),

            interaction_reply: non_empty("INTERACTION_REPLY")
                .unwrap_or_else(|| DEFAULT_INTERACTION_REPLY.to_string()),
        };

        for name in config.missing_required() {
            warn!(env_var = name, "required_config_missing");
        }

        config
    }

    /// Names of required variables that are empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("PUBLIC_KEY", &self.public_key),
            ("CLIENT_ID", &self.client_id),
            ("CLIENT_SECRET", &self.client_secret),
            ("REDIRECT_URI", &self.redirect_uri),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

// Secrets stay out of logs even when the config is debug-printed.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("public_key", &self.public_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("port", &self.port)
            .field("api_base_url", &self.api_base_url)
            .field("platform_name", &self.platform_name)
            .field("interaction_reply", &self.interaction_reply)
            .finish()
    }
}
