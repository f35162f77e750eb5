//! Request and response types for auth-related API calls. Request payloads carry
//! passwords and tokens, so they borrow from `SecretString` at send time and are
//! never `Debug`.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown role {other:?}, expected USER or ADMIN")),
        }
    }
}

/// Identity of the signed-in user, mirrored in the token store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl UserProfile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Token and profile returned by a successful login or registration.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub token: SecretString,
    pub profile: UserProfile,
}

#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ValidateRequest<'a> {
    pub token: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct ValidateResponse {
    pub valid: bool,
}

#[derive(Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<AuthResponse> for Credentials {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: SecretString::from(response.token),
            profile: UserProfile {
                username: response.username,
                email: response.email,
                role: response.role,
            },
        }
    }
}
