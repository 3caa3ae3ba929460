//! Async client for the Discord REST endpoints used by Linked Roles.
//!
//! The client holds one pooled `reqwest::Client` shared by every request.
//! It does not retry and applies no timeout of its own.

use reqwest::{Client, Response};
use thiserror::Error;
use tracing::info;
use url::Url;

use super::types::{
    OAuthCredentials, OAuthToken, RoleConnectionMetadata, UserIdentity, LINKED_ROLES_SCOPE,
};

/// Errors from a single REST call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// REST client bound to one API base URL.
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    api_base: String,
}

impl PlatformClient {
    /// Create a client for `api_base`, e.g. `https://discord.com/api`.
    pub fn new(http: Client, api_base: &str) -> Result<Self, url::ParseError> {
        // Validate once so endpoint URLs built later are well-formed.
        Url::parse(api_base)?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// Build the OAuth2 authorize URL the browser is redirected to.
    pub fn authorize_url(&self, client_id: &str, redirect_uri: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.endpoint("oauth2/authorize"),
            &[
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", LINKED_ROLES_SCOPE),
            ],
        )
    }

    /// Exchange a one-time authorization code for an access token.
    pub async fn exchange_code(
        &self,
        credentials: &OAuthCredentials<'_>,
        code: &str,
    ) -> Result<OAuthToken, ApiError> {
        let form = [
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri),
        ];

        let response = self
            .http
            .post(self.endpoint("oauth2/token"))
            .form(&form)
            .send()
            .await
            .map_err(ApiError::Request)?;

        let token: OAuthToken = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(ApiError::Decode)?;

        info!(
            token_type = ?token.token_type,
            scope = ?token.scope,
            "oauth_token_obtained"
        );

        Ok(token)
    }

    /// Fetch the user the token was issued for.
    pub async fn current_user(&self, token: &OAuthToken) -> Result<UserIdentity, ApiError> {
        let response = self
            .http
            .get(self.endpoint("users/@me"))
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(ApiError::Request)?;

        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(ApiError::Decode)
    }

    /// Replace the user's role-connection metadata for this application.
    pub async fn put_role_connection(
        &self,
        client_id: &str,
        token: &OAuthToken,
        metadata: &RoleConnectionMetadata,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.endpoint(&format!(
                "users/@me/applications/{}/role-connection",
                client_id
            )))
            .bearer_auth(&token.access_token)
            .json(metadata)
            .send()
            .await
            .map_err(ApiError::Request)?;

        ensure_success(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into [`ApiError::Status`], keeping the body for logs.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PlatformClient {
        PlatformClient::new(Client::new(), &format!("{}/api/", server.uri())).unwrap()
    }

    fn token(value: &str) -> OAuthToken {
        serde_json::from_value(json!({ "access_token": value })).unwrap()
    }

    fn credentials() -> OAuthCredentials<'static> {
        OAuthCredentials {
            client_id: "1234",
            client_secret: "secret",
            redirect_uri: "https://example.com/api/linked-roles",
        }
    }

    #[test]
    fn test_new_rejects_invalid_base() {
        assert!(PlatformClient::new(Client::new(), "not a url").is_err());
    }

    #[test]
    fn test_authorize_url() {
        let client = PlatformClient::new(Client::new(), "https://discord.com/api").unwrap();
        let url = client
            .authorize_url("1234", "https://example.com/api/linked-roles")
            .unwrap();

        assert_eq!(url.path(), "/api/oauth2/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("client_id".to_string(), "1234".to_string()),
                (
                    "redirect_uri".to_string(),
                    "https://example.com/api/linked-roles".to_string()
                ),
                ("response_type".to_string(), "code".to_string()),
                ("scope".to_string(), "identify role_connections.write".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_exchange_code_sends_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth2/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc123"))
            .and(body_string_contains("client_secret=secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok",
                "token_type": "Bearer",
                "expires_in": 604800,
                "scope": "identify role_connections.write"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server)
            .exchange_code(&credentials(), "abc123")
            .await
            .unwrap();

        assert_eq!(token.access_token, "tok");
        assert_eq!(token.expires_in, Some(604800));
    }

    #[tokio::test]
    async fn test_exchange_code_status_error_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .exchange_code(&credentials(), "used")
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("invalid_grant"));
            }
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exchange_code_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .exchange_code(&credentials(), "abc123")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_current_user_uses_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/@me"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "80351110224678912",
                "username": "alice",
                "discriminator": "1234"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = client_for(&server).current_user(&token("tok")).await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.tag(), "alice#1234");
    }

    #[tokio::test]
    async fn test_put_role_connection() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/@me/applications/1234/role-connection"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({
                "platform_name": "MyApp",
                "platform_username": "alice",
                "metadata": { "verified": 1 }
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let user: UserIdentity = serde_json::from_value(json!({ "username": "alice" })).unwrap();
        let metadata = RoleConnectionMetadata::verified("MyApp", &user);

        client_for(&server)
            .put_role_connection("1234", &token("tok"), &metadata)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_request_error_when_unreachable() {
        // Nothing listens on port 9 of the loopback interface.
        let client = PlatformClient::new(Client::new(), "http://127.0.0.1:9/api").unwrap();

        let err = client.current_user(&token("tok")).await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }
}
