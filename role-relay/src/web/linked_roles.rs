//! Linked Roles OAuth2 endpoint.
//!
//! A single `GET /api/linked-roles` drives the whole browser flow:
//!
//! ```text
//! no code  → 302 to oauth2/authorize
//! code     → oauth2/token → users/@me → PUT role-connection → result page
//! ```
//!
//! Every step runs once, in order, and the first failure ends the request.
//! Failures are rendered as HTML with status 200 since a browser is on the
//! other end.

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use html_escape::encode_text;
use thiserror::Error;
use tracing::{error, info};

use crate::platform::{ApiError, OAuthCredentials, RoleConnectionMetadata, UserIdentity};
use crate::web::page::render_page;
use crate::web::AppState;

/// Failure of one step of the exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("token exchange failed: {0}")]
    TokenExchange(#[source] ApiError),

    #[error("fetching the user failed: {0}")]
    FetchIdentity(#[source] ApiError),

    #[error("updating the role connection failed: {0}")]
    PushMetadata(#[source] ApiError),
}

impl ExchangeError {
    fn api_error(&self) -> &ApiError {
        match self {
            ExchangeError::TokenExchange(e)
            | ExchangeError::FetchIdentity(e)
            | ExchangeError::PushMetadata(e) => e,
        }
    }
}

/// `GET /api/linked-roles`.
pub async fn linked_roles(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let code = query.as_deref().and_then(authorization_code);

    let Some(code) = code else {
        return redirect_to_authorize(&state);
    };

    info!(code_length = code.len(), "linked_roles_callback");

    match link_account(&state, &code).await {
        Ok(user) => {
            info!(
                user_id = user.id.as_deref().unwrap_or(""),
                username = %user.username,
                "linked_roles_connected"
            );
            success_page(&user).into_response()
        }
        Err(e) => failure_page(&e).into_response(),
    }
}

/// First non-empty `code` query parameter.
fn authorization_code(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == "code" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

fn redirect_to_authorize(state: &AppState) -> Response {
    let config = &state.config;

    match state
        .platform
        .authorize_url(&config.client_id, &config.redirect_uri)
    {
        Ok(url) => {
            info!("linked_roles_redirect_to_authorize");
            (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
        }
        Err(e) => {
            error!(error = %e, "linked_roles_authorize_url_invalid");
            unexpected_page(&e.to_string()).into_response()
        }
    }
}

/// Run token exchange, identity fetch and metadata push in order.
async fn link_account(state: &AppState, code: &str) -> Result<UserIdentity, ExchangeError> {
    let config = &state.config;
    let credentials = OAuthCredentials {
        client_id: &config.client_id,
        client_secret: &config.client_secret,
        redirect_uri: &config.redirect_uri,
    };

    let token = state
        .platform
        .exchange_code(&credentials, code)
        .await
        .map_err(ExchangeError::TokenExchange)?;

    let user = state
        .platform
        .current_user(&token)
        .await
        .map_err(ExchangeError::FetchIdentity)?;

    let metadata = RoleConnectionMetadata::verified(&config.platform_name, &user);
    state
        .platform
        .put_role_connection(&config.client_id, &token, &metadata)
        .await
        .map_err(ExchangeError::PushMetadata)?;

    Ok(user)
}

fn success_page(user: &UserIdentity) -> axum::response::Html<String> {
    render_page(&format!(
        r#"<h1 class="ok">✅ Linked Role connected</h1>
<p>User: <strong>{}</strong></p>
<p>You can close this tab. If your server role has a rule like
<code>verified ≥ 1</code>, Discord will grant it.</p>"#,
        encode_text(&user.tag())
    ))
}

fn failure_page(err: &ExchangeError) -> axum::response::Html<String> {
    let ApiError::Status { status, body } = err.api_error() else {
        error!(error = %err, "linked_roles_unexpected_error");
        return unexpected_page(&err.to_string());
    };

    match err {
        ExchangeError::TokenExchange(_) => {
            error!(status = status, body = %body, "token_exchange_failed");
            render_page(&format!(
                r#"<h1 class="err">Authorization failed</h1>
<p>Could not exchange authorization code for a token.</p>
<p><code>{}</code></p>"#,
                status
            ))
        }
        ExchangeError::FetchIdentity(_) => {
            error!(status = status, body = %body, "fetch_user_failed");
            render_page(&format!(
                r#"<h1 class="err">Could not fetch your Discord profile</h1>
<p><code>{}</code></p>"#,
                status
            ))
        }
        ExchangeError::PushMetadata(_) => {
            error!(status = status, body = %body, "role_connection_update_failed");
            render_page(&format!(
                r#"<h1 class="err">Linked Role update failed</h1>
<p>Check that your metadata schema includes a key <code>verified</code>
(Integer) and the value type matches.</p>
<p><code>{}</code></p>"#,
                status
            ))
        }
    }
}

fn unexpected_page(message: &str) -> axum::response::Html<String> {
    let message = if message.is_empty() {
        "Something went wrong."
    } else {
        message
    };

    render_page(&format!(
        r#"<h1 class="err">Unexpected error</h1>
<p>{}</p>"#,
        encode_text(message)
    ))
}
