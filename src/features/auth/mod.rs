//! Auth feature module: the auth service client, its payload types and the
//! client-side form validation that gates submission. This module touches
//! security boundaries and must avoid logging secrets or token material.
//!
//! Flow Overview: register and login both return a bearer token plus the user
//! profile, which the session manager persists. Validate answers whether a
//! persisted token is still accepted and is only used during reconciliation.

pub mod client;
pub mod types;
pub mod validation;

pub use client::{AuthClient, TokenValidity};
pub use types::{Credentials, Role, UserProfile};
pub use validation::{PasswordRule, ValidationError};
