//! Session manager: owns the in-memory session, reconciles it with the token
//! store once per lifetime and exposes login, register and logout to views.
//!
//! Reconciliation is a gate. Protected views await [`SessionManager::initialize`]
//! before reading [`SessionManager::is_authenticated`]; concurrent callers share
//! the same in-flight run. A mutation that completes while reconciliation is in
//! flight wins over the reconciliation result.

use super::{
    policy::ValidationPolicy,
    storage::StorageError,
    store::{Stored, TokenStore},
};
use crate::{
    common::AuthError,
    features::auth::{AuthClient, Credentials, TokenValidity, UserProfile},
};
use secrecy::SecretString;
use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use thiserror::Error;
use tokio::{sync::OnceCell, time::sleep};
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Reconciling,
    Authenticated,
    Anonymous,
}

impl fmt::Display for SessionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Reconciling => "reconciling",
            Self::Authenticated => "authenticated",
            Self::Anonymous => "anonymous",
        };
        formatter.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("failed to persist session: {0}")]
    Storage(#[from] StorageError),
    #[error("not signed in")]
    NotAuthenticated,
    #[error("admin role required")]
    Forbidden,
}

#[derive(Debug, Default)]
struct Session {
    state: SessionState,
    user: Option<UserProfile>,
    // Bumped by every login, register and logout.
    generation: u64,
}

enum Outcome {
    Authenticated(UserProfile),
    Anonymous { clear: bool },
}

#[derive(Debug)]
pub struct SessionManager {
    client: AuthClient,
    store: Arc<TokenStore>,
    policy: ValidationPolicy,
    session: RwLock<Session>,
    reconciled: OnceCell<()>,
}

impl SessionManager {
    #[must_use]
    pub fn new(client: AuthClient, store: Arc<TokenStore>, policy: ValidationPolicy) -> Self {
        Self {
            client,
            store,
            policy,
            session: RwLock::new(Session::default()),
            reconciled: OnceCell::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reconciles the persisted session with the auth service. Runs once per
    /// manager; later and concurrent calls wait for the first run and return
    /// the state it settled on.
    pub async fn initialize(&self) -> SessionState {
        self.reconciled.get_or_init(|| self.reconcile()).await;
        self.state()
    }

    #[instrument(skip_all)]
    async fn reconcile(&self) {
        let generation = {
            let mut session = self.write();
            if session.state == SessionState::Uninitialized {
                session.state = SessionState::Reconciling;
            }
            session.generation
        };

        let outcome = self.resolve().await;
        self.settle(generation, outcome);
    }

    async fn resolve(&self) -> Outcome {
        let token = match self.store.read_token() {
            Stored::Present(token) => token,
            Stored::Absent => {
                debug!("no persisted token");
                return Outcome::Anonymous { clear: false };
            }
            Stored::Corrupt(reason) => {
                warn!("discarding unreadable token: {reason}");
                return Outcome::Anonymous { clear: true };
            }
        };

        match self.validate(&token).await {
            TokenValidity::Valid => match self.store.read_profile() {
                Stored::Present(profile) => Outcome::Authenticated(profile),
                Stored::Absent => {
                    warn!("token is valid but no cached profile is stored");
                    Outcome::Anonymous { clear: true }
                }
                Stored::Corrupt(reason) => {
                    warn!("discarding unreadable profile: {reason}");
                    Outcome::Anonymous { clear: true }
                }
            },
            TokenValidity::Invalid => {
                info!("persisted token was rejected");
                Outcome::Anonymous { clear: true }
            }
            TokenValidity::Unknown(err) => {
                let keep = self.policy.keeps_credentials_when_unknown();
                warn!(keep_credentials = keep, "token validation failed: {err}");
                Outcome::Anonymous { clear: !keep }
            }
        }
    }

    async fn validate(&self, token: &SecretString) -> TokenValidity {
        let mut validity = self.client.validate(token).await;
        let mut remaining = self.policy.extra_attempts();

        while remaining > 0 && matches!(validity, TokenValidity::Unknown(_)) {
            remaining -= 1;
            sleep(self.policy.retry_delay()).await;
            debug!(remaining, "retrying token validation");
            validity = self.client.validate(token).await;
        }

        validity
    }

    fn settle(&self, generation: u64, outcome: Outcome) {
        let mut session = self.write();
        if session.generation != generation {
            debug!("reconciliation superseded by a newer session change");
            return;
        }

        match outcome {
            Outcome::Authenticated(profile) => {
                info!(username = %profile.username, "session restored");
                session.user = Some(profile);
                session.state = SessionState::Authenticated;
            }
            Outcome::Anonymous { clear } => {
                if clear {
                    if let Err(err) = self.store.clear() {
                        warn!("failed to clear persisted session: {err}");
                    }
                }
                session.user = None;
                session.state = SessionState::Anonymous;
            }
        }
    }

    /// # Errors
    /// Returns the auth error, or a storage error if the session cannot be
    /// persisted. The current session is left unchanged on failure.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<UserProfile, SessionError> {
        let credentials = self.client.login(username, password).await?;
        self.establish(credentials)
    }

    /// Registration is an implicit login.
    ///
    /// # Errors
    /// Same as [`SessionManager::login`].
    #[instrument(skip(self, email, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, SessionError> {
        let credentials = self.client.register(username, email, password).await?;
        self.establish(credentials)
    }

    fn establish(&self, credentials: Credentials) -> Result<UserProfile, SessionError> {
        let mut session = self.write();
        self.store.save(&credentials.token, &credentials.profile)?;

        session.user = Some(credentials.profile.clone());
        session.state = SessionState::Authenticated;
        session.generation += 1;

        info!(username = %credentials.profile.username, "signed in");
        Ok(credentials.profile)
    }

    /// Local sign-out. Never fails; storage errors are logged.
    pub fn logout(&self) {
        let mut session = self.write();
        if let Err(err) = self.store.clear() {
            warn!("failed to clear persisted session: {err}");
        }

        session.user = None;
        session.state = SessionState::Anonymous;
        session.generation += 1;
        info!("signed out");
    }

    /// True only while a profile is held in memory and a token is persisted.
    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some() && self.store.has_token()
    }

    pub fn state(&self) -> SessionState {
        self.read().state
    }

    pub fn user(&self) -> Option<UserProfile> {
        if self.is_authenticated() {
            self.read().user.clone()
        } else {
            None
        }
    }

    /// UX guard for admin views; the admin service enforces the real check.
    ///
    /// # Errors
    /// `NotAuthenticated` when anonymous, `Forbidden` for non-admin users.
    pub fn require_admin(&self) -> Result<UserProfile, SessionError> {
        let user = self.user().ok_or(SessionError::NotAuthenticated)?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(SessionError::Forbidden)
        }
    }
}
