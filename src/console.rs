//! Wires configuration, storage and the feature clients into one handle that
//! views hold for the lifetime of the process.

use crate::{
    common::{api::http_client, AppConfig, AuthError},
    features::{
        auth::{AuthClient, UserProfile},
        session::{FileStorage, SessionError, SessionManager, SessionState, Storage, TokenStore},
        users::AdminClient,
    },
};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Console {
    session: SessionManager,
    admin: AdminClient,
}

impl Console {
    /// Persists the session as files under the configured state directory.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AuthError> {
        let storage = FileStorage::new(&config.state_dir);
        Self::with_storage(config, Box::new(storage))
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(config: &AppConfig, storage: Box<dyn Storage>) -> Result<Self, AuthError> {
        debug!(
            auth_url = %config.auth_base_url,
            admin_url = %config.admin_base_url,
            "building console"
        );
        let http = http_client(config.request_timeout)?;
        let store = Arc::new(TokenStore::new(storage));

        let auth = AuthClient::new(http.clone(), &config.auth_base_url);
        let session = SessionManager::new(auth, Arc::clone(&store), config.validation_policy.clone());
        let admin = AdminClient::new(http, &config.admin_base_url, store);

        Ok(Self { session, admin })
    }

    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub const fn admin(&self) -> &AdminClient {
        &self.admin
    }

    /// Gate for protected views: reconciles first, then requires a signed-in user.
    ///
    /// # Errors
    /// `NotAuthenticated` when reconciliation ends anonymous.
    pub async fn require_session(&self) -> Result<UserProfile, SessionError> {
        if self.session.initialize().await != SessionState::Authenticated {
            return Err(SessionError::NotAuthenticated);
        }
        self.session.user().ok_or(SessionError::NotAuthenticated)
    }

    /// Gate for admin views.
    ///
    /// # Errors
    /// `NotAuthenticated` or `Forbidden`.
    pub async fn require_admin(&self) -> Result<UserProfile, SessionError> {
        self.session.initialize().await;
        self.session.require_admin()
    }
}
