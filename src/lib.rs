//! # authconsole
//!
//! Administrative console for a user-authentication service. The library holds
//! everything a view needs to talk to the service; the `authconsole` binary is a
//! thin command-line view on top of it.
//!
//! ## Session lifecycle
//!
//! 1. **Reconcile:** on start the [`SessionManager`](features::session::SessionManager)
//!    reads the persisted bearer token and asks `/api/auth/validate` whether it is
//!    still good. Only then is the cached profile trusted.
//! 2. **Login / Register:** a successful call persists the token and profile
//!    together and marks the session authenticated.
//! 3. **Logout:** a local clear of the persisted state. No network call is needed.
//!
//! ## Admin surface
//!
//! The [`AdminClient`](features::users::AdminClient) attaches the persisted bearer
//! token to every `/api/admin/users` call. Role checks in this crate are UX-only;
//! the admin service enforces access control.
//!
//! Tokens and passwords are carried as `SecretString` and must never be logged.

pub mod cli;
pub mod common;
pub mod console;
pub mod features;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub use console::Console;
