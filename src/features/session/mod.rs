//! Session feature module: persistence of the bearer token and cached profile,
//! startup reconciliation and the login/register/logout lifecycle.
//!
//! Flow Overview: [`TokenStore`] owns the persisted pair, [`SessionManager`]
//! owns the in-memory session and decides when the persisted pair is trusted.
//! The [`ValidationPolicy`] controls what happens when the auth service cannot
//! give a definitive answer during reconciliation.

pub mod manager;
pub mod policy;
pub mod storage;
pub mod store;

pub use manager::{SessionError, SessionManager, SessionState};
pub use policy::ValidationPolicy;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{Stored, TokenStore};
