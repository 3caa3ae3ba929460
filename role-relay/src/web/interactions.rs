//! Interaction webhook endpoint.
//!
//! The handler only:
//! 1. Verifies the Ed25519 signature over the untouched request bytes
//! 2. Answers pings with a pong
//! 3. Answers every other interaction with a fixed message

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::platform::{InteractionPayload, InteractionResponse};
use crate::web::AppState;

/// Header carrying the hex-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the timestamp that prefixes the signed message.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Body of the 401 answer to an unverifiable request.
pub const BAD_SIGNATURE: &str = "Bad request signature";

/// Route probe response for browsers.
#[derive(Serialize)]
pub struct RouteProbe {
    pub ok: bool,
    pub route: &'static str,
}

/// `GET /api/interactions`: confirm the route is deployed.
pub async fn interactions_probe() -> Json<RouteProbe> {
    Json(RouteProbe {
        ok: true,
        route: "/api/interactions",
    })
}

/// `POST /api/interactions`: the interaction webhook.
pub async fn interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);

    info!(
        has_signature = !signature.is_empty(),
        has_timestamp = !timestamp.is_empty(),
        body_length = body.len(),
        "interaction_received"
    );

    match state
        .verifier
        .verify(&body, signature, timestamp, &state.config.public_key)
    {
        Ok(true) => {}
        Ok(false) => {
            warn!("interaction_signature_invalid");
            return (StatusCode::UNAUTHORIZED, BAD_SIGNATURE).into_response();
        }
        Err(e) => {
            warn!(error = %e, "interaction_signature_unverifiable");
            return (StatusCode::UNAUTHORIZED, BAD_SIGNATURE).into_response();
        }
    }

    let payload = match InteractionPayload::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "interaction_body_invalid");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if payload.is_ping() {
        info!("interaction_ping");
        return Json(InteractionResponse::pong()).into_response();
    }

    info!(interaction_type = ?payload.kind, "interaction_command");
    Json(InteractionResponse::message(state.config.interaction_reply.as_str())).into_response()
}

/// Header value as text, empty when missing or not visible ASCII.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
