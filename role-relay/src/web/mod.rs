//! Web server module for the interaction webhook and the Linked Roles flow.
//!
//! This module provides a thin web server that:
//! - Verifies and answers Discord interaction webhooks
//! - Drives the OAuth2 Linked Roles flow in the user's browser
//!
//! Handlers share only immutable state, so requests run fully concurrently.

pub mod handlers;
pub mod interactions;
pub mod linked_roles;
pub mod page;
pub mod signature;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{health, AppState, HealthResponse};
pub use interactions::{interactions, interactions_probe, RouteProbe};
pub use linked_roles::{linked_roles, ExchangeError};
pub use signature::{Ed25519Verifier, SignatureVerifier, VerificationError};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/interactions",
            get(interactions_probe).post(interactions),
        )
        .route("/api/linked-roles", get(linked_roles))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
