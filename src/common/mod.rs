//! Shared utilities for API access, configuration and errors.
//!
//! Centralizing these helpers keeps network behavior consistent between the auth
//! and admin clients and avoids duplicated request setup. These utilities do not
//! handle secrets directly, but callers must still avoid logging sensitive data.

pub mod api;
pub mod config;
pub mod errors;

pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use errors::{AuthError, ErrorKind};
