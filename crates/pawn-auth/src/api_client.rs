//! REST client for the PawnRepo backend's auth and user endpoints.

use crate::forms::RegistrationForm;
use crate::session::SessionStore;
use crate::{AuthError, AuthResult, UserProfile};
use reqwest::header::AUTHORIZATION;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, error, warn};

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Pull FastAPI's `detail` message out of an error body. Validation errors
/// carry a list there, which is flattened to its `msg` entries.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Tokens issued by a successful credential exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken", alias = "access_token")]
    pub access_token: String,
    #[serde(rename = "refreshToken", alias = "refresh_token", default)]
    pub refresh_token: Option<String>,
}

/// Read a user object from either `{"data": {...}}` or the bare object.
/// A `data` field that is present but not an object (including `null`)
/// is rejected.
fn parse_profile(body: &str) -> Result<UserProfile, String> {
    let mut object: Map<String, Value> = serde_json::from_str(body).map_err(|e| e.to_string())?;
    match object.remove("data") {
        Some(Value::Object(fields)) => Ok(UserProfile::new(fields)),
        Some(other) => Err(format!("data is not a user object: {other}")),
        None => Ok(UserProfile::new(object)),
    }
}

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl ApiClient {
    /// Create a client for the API rooted at `api_url`
    /// (e.g. `http://localhost:8000/api/v1`).
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Exchange an identifier/secret pair for tokens.
    pub async fn exchange_credentials(&self, identifier: &str, secret: &str) -> AuthResult<TokenPair> {
        let url = self.endpoint("auth/login");
        debug!(url = %url, "Exchanging credentials");

        let response = self
            .http_client
            .post(&url)
            .form(&[("username", identifier), ("password", secret)])
            .send()
            .await?;

        let response = Self::check_status(response, "credential exchange").await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body_summary = %summarize_response_body(&body),
                "Token response did not contain an access token"
            );
            AuthError::MalformedResponse(format!("token response: {e}"))
        })
    }

    /// Fetch the profile of the user the session belongs to.
    pub async fn fetch_profile(&self, session: &SessionStore) -> AuthResult<UserProfile> {
        let url = self.endpoint("user/me");
        debug!(url = %url, "Fetching user profile");

        let mut request = self.http_client.get(&url);
        match session.authorization_header() {
            Some(value) => request = request.header(AUTHORIZATION, value),
            None => warn!("Fetching profile without an active session"),
        }

        let response = Self::check_status(request.send().await?, "profile fetch").await?;
        let body = response.text().await?;
        parse_profile(&body).map_err(|e| {
            error!(
                error = %e,
                body_summary = %summarize_response_body(&body),
                "Profile response was not a user object"
            );
            AuthError::MalformedResponse(format!("profile response: {e}"))
        })
    }

    /// Create an account. Returns the created user's profile.
    pub async fn register(&self, form: &RegistrationForm) -> AuthResult<UserProfile> {
        let url = self.endpoint("user/create");
        debug!(url = %url, "Registering user");

        let response = self.http_client.post(&url).json(form).send().await?;
        let response = Self::check_status(response, "registration").await?;
        let body = response.text().await?;
        parse_profile(&body).map_err(|e| {
            error!(
                error = %e,
                body_summary = %summarize_response_body(&body),
                "Registration response was not a user object"
            );
            AuthError::MalformedResponse(format!("registration response: {e}"))
        })
    }

    /// Map non-success statuses to errors, consuming the body for its detail.
    async fn check_status(response: Response, operation: &str) -> AuthResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body_summary = summarize_response_body(&body);
        let detail = error_detail(&body);
        warn!(
            operation,
            status = %status,
            body_summary = %body_summary,
            "Backend request failed"
        );

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AuthError::InvalidCredentials(
                detail.unwrap_or_else(|| "credentials were not accepted".to_string()),
            ),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                AuthError::Rejected(detail.unwrap_or_else(|| status.to_string()))
            }
            _ => AuthError::UnexpectedStatus {
                status,
                body_summary,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let client = ApiClient::new("http://localhost:8000/api/v1/");
        assert_eq!(client.api_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            client.endpoint("/auth/login"),
            "http://localhost:8000/api/v1/auth/login"
        );
        assert_eq!(
            client.endpoint("user/me"),
            "http://localhost:8000/api/v1/user/me"
        );
    }

    #[test]
    fn test_summarize_response_body_hides_content() {
        let summary = summarize_response_body(r#"{"access_token":"secret"}"#);
        assert!(summary.starts_with("len=25,digest="));
        assert!(!summary.contains("secret"));
    }

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail":"Incorrect email or password"}"#).as_deref(),
            Some("Incorrect email or password")
        );
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"},{"msg":"too short"}]}"#;
        assert_eq!(
            error_detail(body).as_deref(),
            Some("value is not a valid email address; too short")
        );
    }

    #[test]
    fn test_error_detail_absent() {
        assert_eq!(error_detail("not json"), None);
        assert_eq!(error_detail(r#"{"message":"nope"}"#), None);
        assert_eq!(error_detail(r#"{"detail":[]}"#), None);
    }

    #[test]
    fn test_token_pair_accepts_both_casings() {
        let camel: TokenPair =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert_eq!(camel.access_token, "a");
        assert_eq!(camel.refresh_token.as_deref(), Some("r"));

        let snake: TokenPair = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","token_type":"bearer"}"#,
        )
        .unwrap();
        assert_eq!(snake.access_token, "a");
        assert_eq!(snake.refresh_token.as_deref(), Some("r"));

        let access_only: TokenPair = serde_json::from_str(r#"{"accessToken":"a"}"#).unwrap();
        assert_eq!(access_only.refresh_token, None);
    }

    #[test]
    fn test_token_pair_requires_access_token() {
        assert!(serde_json::from_str::<TokenPair>(r#"{"refreshToken":"r"}"#).is_err());
    }

    #[test]
    fn test_parse_profile_envelope_and_bare() {
        let wrapped = parse_profile(r#"{"data":{"username":"alice"}}"#).unwrap();
        assert_eq!(wrapped.get_str("username"), Some("alice"));
        assert!(wrapped.get("data").is_none());

        let bare = parse_profile(r#"{"user_id":"5f1c","username":"alice"}"#).unwrap();
        assert_eq!(bare.get_str("username"), Some("alice"));
        assert_eq!(bare.get_str("user_id"), Some("5f1c"));
    }

    #[test]
    fn test_parse_profile_rejects_empty_data() {
        assert!(parse_profile(r#"{"data":null}"#).is_err());
        assert!(parse_profile(r#"{"data":"alice"}"#).is_err());
        assert!(parse_profile("[]").is_err());
        assert!(parse_profile("not json").is_err());
    }
}
