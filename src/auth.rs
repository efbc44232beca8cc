//! HTTP Basic authentication guard.
//!
//! Every request except `OPTIONS /translate` must carry credentials matching the
//! single configured username/password pair.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::state::AppState;

const BASIC_PREFIX: &str = "Basic ";
const CHALLENGE: &str = "Basic realm=\"Darija Translator API\"";
const PREFLIGHT_PATH: &str = "/translate";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Authorization scheme is not Basic")]
    InvalidScheme,

    #[error("Malformed basic credentials")]
    MalformedCredentials,

    #[error("Server credentials not configured")]
    NotConfigured,

    #[error("Credentials do not match")]
    Mismatch,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE))],
            "Unauthorized",
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Check a raw `Authorization` header value against these credentials.
    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthError> {
        if !self.is_configured() {
            return Err(AuthError::NotConfigured);
        }

        let header = header.ok_or(AuthError::MissingHeader)?;
        let encoded = header
            .strip_prefix(BASIC_PREFIX)
            .ok_or(AuthError::InvalidScheme)?;

        let decoded = BASE64
            .decode(encoded)
            .map_err(|_| AuthError::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;

        // Only the first colon separates; passwords may contain more.
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedCredentials)?;

        if username == self.username && password == self.password {
            Ok(())
        } else {
            Err(AuthError::Mismatch)
        }
    }
}

pub async fn require_basic_auth(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    // Browsers never attach credentials to a preflight.
    if req.method() == Method::OPTIONS && req.uri().path() == PREFLIGHT_PATH {
        return Ok(next.run(req).await);
    }

    let verdict = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => match value.to_str() {
            Ok(value) => state.config.credentials.verify(Some(value)),
            Err(_) => Err(AuthError::MalformedCredentials),
        },
        None => state.config.credentials.verify(None),
    };

    if let Err(e) = verdict {
        warn!("Rejected {} {}: {}", req.method(), req.uri().path(), e);
        return Err(e);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(raw: &str) -> String {
        format!("Basic {}", BASE64.encode(raw))
    }

    fn creds() -> Credentials {
        Credentials::new("darija-client", "darija-secret")
    }

    #[test]
    fn test_matching_credentials_pass() {
        assert_eq!(creds().verify(Some(&basic("darija-client:darija-secret"))), Ok(()));
    }

    #[test]
    fn test_missing_header_fails() {
        assert_eq!(creds().verify(None), Err(AuthError::MissingHeader));
    }

    #[test]
    fn test_bearer_scheme_fails() {
        assert_eq!(
            creds().verify(Some("Bearer darija-secret")),
            Err(AuthError::InvalidScheme)
        );
    }

    #[test]
    fn test_lowercase_scheme_fails() {
        let header = format!("basic {}", BASE64.encode("darija-client:darija-secret"));
        assert_eq!(creds().verify(Some(&header)), Err(AuthError::InvalidScheme));
    }

    #[test]
    fn test_malformed_base64_fails() {
        assert_eq!(
            creds().verify(Some("Basic !!!not-base64!!!")),
            Err(AuthError::MalformedCredentials)
        );
    }

    #[test]
    fn test_missing_colon_fails() {
        assert_eq!(
            creds().verify(Some(&basic("darija-client"))),
            Err(AuthError::MalformedCredentials)
        );
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let header = format!("Basic {}", BASE64.encode([0xff, 0xfe, b':', b'x']));
        assert_eq!(creds().verify(Some(&header)), Err(AuthError::MalformedCredentials));
    }

    #[test]
    fn test_wrong_password_fails() {
        assert_eq!(
            creds().verify(Some(&basic("darija-client:wrong"))),
            Err(AuthError::Mismatch)
        );
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        assert_eq!(
            creds().verify(Some(&basic("Darija-Client:darija-secret"))),
            Err(AuthError::Mismatch)
        );
    }

    #[test]
    fn test_password_may_contain_colons() {
        let creds = Credentials::new("user", "pa:ss:word");
        assert_eq!(creds.verify(Some(&basic("user:pa:ss:word"))), Ok(()));
        assert_eq!(creds.verify(Some(&basic("user:pa"))), Err(AuthError::Mismatch));
    }

    #[test]
    fn test_empty_configured_credentials_reject_everything() {
        let creds = Credentials::new("", "");
        assert_eq!(creds.verify(Some(&basic(":"))), Err(AuthError::NotConfigured));

        let creds = Credentials::new("user", "");
        assert_eq!(creds.verify(Some(&basic("user:"))), Err(AuthError::NotConfigured));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", creds());
        assert!(!rendered.contains("darija-secret"));
    }

    #[test]
    fn test_rejection_carries_challenge() {
        let response = AuthError::Mismatch.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            CHALLENGE
        );
    }
}
