//! Client wrappers for the auth service endpoints. These helpers centralize
//! request shapes and error normalization, keeping session code free of HTTP
//! details and preventing password or token leakage into logs.

use crate::{
    common::{
        api::{self, build_url},
        AuthError, ErrorKind,
    },
    features::auth::types::{
        AuthResponse, Credentials, LoginRequest, RegisterRequest, ValidateRequest,
        ValidateResponse,
    },
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{instrument, warn};
use url::Url;

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const VALIDATE_PATH: &str = "/api/auth/validate";

/// Outcome of a token validation call. Validation never fails outright; an
/// inconclusive answer is reported as `Unknown` so the caller can apply its
/// own policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenValidity {
    Valid,
    Invalid,
    Unknown(AuthError),
}

#[derive(Clone, Debug)]
pub struct AuthClient {
    http: Client,
    base_url: String,
}

impl AuthClient {
    #[must_use]
    pub fn new(http: Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    /// Creates an account; the returned credentials act as an implicit login.
    ///
    /// # Errors
    /// Returns a normalized `AuthError` on transport failure or non-2xx status.
    #[instrument(skip(self, email, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Credentials, AuthError> {
        let request = RegisterRequest {
            username,
            email,
            password: password.expose_secret(),
        };
        let response: AuthResponse = self
            .post_json("auth.register", REGISTER_PATH, &request)
            .await?;
        Ok(response.into())
    }

    /// Exchanges a username and password for a bearer token and profile.
    ///
    /// # Errors
    /// Returns a normalized `AuthError` on transport failure or non-2xx status.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Credentials, AuthError> {
        let request = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        let response: AuthResponse = self.post_json("auth.login", LOGIN_PATH, &request).await?;
        Ok(response.into())
    }

    /// Asks the auth service whether a token is still good.
    /// A 401/403 is a definitive rejection; any other failure is `Unknown`.
    #[instrument(skip_all)]
    pub async fn validate(&self, token: &SecretString) -> TokenValidity {
        let request = ValidateRequest {
            token: token.expose_secret(),
        };
        match self
            .post_json::<_, ValidateResponse>("auth.validate", VALIDATE_PATH, &request)
            .await
        {
            Ok(response) if response.valid => TokenValidity::Valid,
            Ok(_) => TokenValidity::Invalid,
            Err(err) if err.kind == ErrorKind::InvalidCredentials => TokenValidity::Invalid,
            Err(err) => {
                warn!("token validation inconclusive: {err}");
                TokenValidity::Unknown(err)
            }
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        let url = build_url(&self.base_url, path);
        let request = self.http.post(&url).json(body);
        let response = api::send(operation, "POST", &url, request).await?;
        api::handle_json_response(response).await
    }
}
