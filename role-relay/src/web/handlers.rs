//! Shared application state and the health endpoint.

use std::sync::Arc;

use axum::Json;
use serde::Serialize;

use crate::platform::PlatformClient;
use crate::web::signature::{Ed25519Verifier, SignatureVerifier};
use crate::Config;

/// Shared application state.
///
/// Everything here is immutable after startup, so requests never contend.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<dyn SignatureVerifier>,
    pub platform: PlatformClient,
}

impl AppState {
    /// State using the Ed25519 verifier.
    pub fn new(config: Config, platform: PlatformClient) -> Self {
        Self::with_verifier(config, platform, Arc::new(Ed25519Verifier))
    }

    /// State with a caller-supplied verifier.
    pub fn with_verifier(
        config: Config,
        platform: PlatformClient,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
            platform,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
