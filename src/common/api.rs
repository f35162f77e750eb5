//! HTTP helpers for JSON APIs with consistent timeouts and error handling. Feature
//! clients use these helpers to avoid duplicating request setup and to keep error
//! normalization in one place. The helpers never log request bodies; callers pass
//! bearer tokens in already-built requests.

use super::errors::AuthError;
use crate::APP_USER_AGENT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, Instrument};

/// Maximum number of error body characters surfaced to the operator.
const MAX_ERROR_CHARS: usize = 200;

/// Builds the shared HTTP client with the configured request timeout.
///
/// # Errors
/// Returns a network error if the TLS backend cannot be initialized.
pub fn http_client(timeout: Duration) -> Result<Client, AuthError> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|err| AuthError::network(format!("Failed to build HTTP client: {err}")))
}

/// Builds a URL from an explicit base URL and the provided path.
#[must_use]
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Sends a request inside a span named after the call site.
pub(crate) async fn send(
    operation: &'static str,
    method: &str,
    url: &str,
    request: RequestBuilder,
) -> Result<Response, AuthError> {
    let span = tracing::info_span!("http.request", operation, http.method = method, url = %url);
    let response = request
        .send()
        .instrument(span)
        .await
        .map_err(map_request_error)?;
    debug!(operation, status = response.status().as_u16(), "response received");
    Ok(response)
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
pub(crate) async fn handle_json_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, AuthError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AuthError::server(format!("Failed to decode response: {err}")))
    } else {
        Err(status_error(response).await)
    }
}

/// Handles acknowledgement responses; the body is ignored on success.
pub(crate) async fn handle_empty_response(response: Response) -> Result<(), AuthError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(status_error(response).await)
    }
}

async fn status_error(response: Response) -> AuthError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AuthError::from_status(status, error_message(&body))
}

/// Maps transport errors into network errors with timeout detection.
fn map_request_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::network("Request timed out. Please try again.")
    } else {
        AuthError::network(format!("Unable to reach the server: {err}"))
    }
}

/// Prefers the service's JSON `message`/`error` field over the raw body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let field = json
            .get("message")
            .or_else(|| json.get("error"))
            .and_then(Value::as_str);
        if let Some(message) = field {
            return sanitize_body(message);
        }
    }
    sanitize_body(body)
}

/// Sanitizes HTTP error bodies for operator-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_without_duplicate_slashes() {
        assert_eq!(
            build_url("http://localhost:8081/", "/api/auth/login"),
            "http://localhost:8081/api/auth/login"
        );
        assert_eq!(
            build_url("http://gateway.tld/auth", "api/auth/login"),
            "http://gateway.tld/auth/api/auth/login"
        );
    }

    #[test]
    fn build_url_with_empty_base_returns_path() {
        assert_eq!(build_url("  ", "/api/auth/login"), "/api/auth/login");
    }

    #[test]
    fn error_message_prefers_json_message_field() {
        let body = r#"{"message":"Username already exists","status":409}"#;
        assert_eq!(error_message(body), "Username already exists");
    }

    #[test]
    fn error_message_falls_back_to_error_field() {
        assert_eq!(error_message(r#"{"error":"Unauthorized"}"#), "Unauthorized");
    }

    #[test]
    fn error_message_uses_plain_body() {
        assert_eq!(error_message("  User not found \n"), "User not found");
    }

    #[test]
    fn error_message_handles_empty_body() {
        assert_eq!(error_message(""), "Request failed.");
    }

    #[test]
    fn error_message_truncates_long_bodies() {
        let body = "x".repeat(500);
        assert_eq!(error_message(&body).chars().count(), MAX_ERROR_CHARS);
    }
}
