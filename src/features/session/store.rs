//! Token store: the persistence boundary for the bearer token and the cached
//! user profile. Both values are written and cleared together under one lock,
//! and reads report absence or corruption as values instead of errors so that
//! startup never crashes on a damaged state directory.

use super::storage::{Storage, StorageError};
use crate::features::auth::UserProfile;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

pub const TOKEN_KEY: &str = "token";
pub const PROFILE_KEY: &str = "user";

/// Result of reading a persisted value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stored<T> {
    Present(T),
    Absent,
    Corrupt(String),
}

impl<T> Stored<T> {
    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Corrupt(_) => None,
        }
    }

    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

#[derive(Debug, Default)]
struct Mirror {
    // None until the first read or write touches the token.
    token_present: Option<bool>,
}

#[derive(Debug)]
pub struct TokenStore {
    storage: Box<dyn Storage>,
    mirror: Mutex<Mirror>,
}

impl TokenStore {
    #[must_use]
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            mirror: Mutex::new(Mirror::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Mirror> {
        self.mirror.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persists the token and profile together. The profile is written first;
    /// if the token write fails the previously stored profile is put back.
    ///
    /// # Errors
    /// Returns the first storage failure.
    pub fn save(&self, token: &SecretString, profile: &UserProfile) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(profile)?;
        let mut mirror = self.lock();

        let previous = self.storage.get(PROFILE_KEY).unwrap_or_else(|err| {
            warn!("failed to read cached profile before save: {err}");
            None
        });

        self.storage.set(PROFILE_KEY, &encoded)?;
        if let Err(err) = self.storage.set(TOKEN_KEY, token.expose_secret()) {
            let rollback = match previous.as_deref() {
                Some(previous) => self.storage.set(PROFILE_KEY, previous),
                None => self.storage.remove(PROFILE_KEY),
            };
            if let Err(rollback) = rollback {
                warn!("failed to roll back cached profile: {rollback}");
            }
            return Err(err);
        }

        mirror.token_present = Some(true);
        Ok(())
    }

    /// Removes both values. Both removals are attempted; the first failure is returned.
    ///
    /// # Errors
    /// Returns the first storage failure.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut mirror = self.lock();

        let token = self.storage.remove(TOKEN_KEY);
        let profile = self.storage.remove(PROFILE_KEY);

        mirror.token_present = if token.is_ok() { Some(false) } else { None };
        token.and(profile)
    }

    pub fn read_token(&self) -> Stored<SecretString> {
        let mut mirror = self.lock();

        match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => {
                mirror.token_present = Some(true);
                Stored::Present(SecretString::from(token))
            }
            Ok(Some(_)) => {
                mirror.token_present = Some(false);
                Stored::Corrupt("persisted token is empty".to_string())
            }
            Ok(None) => {
                mirror.token_present = Some(false);
                Stored::Absent
            }
            Err(err) => {
                mirror.token_present = None;
                warn!("failed to read persisted token: {err}");
                Stored::Corrupt(err.to_string())
            }
        }
    }

    pub fn read_profile(&self) -> Stored<UserProfile> {
        let _mirror = self.lock();

        match self.storage.get(PROFILE_KEY) {
            Ok(Some(encoded)) => match serde_json::from_str::<UserProfile>(&encoded) {
                Ok(profile) => Stored::Present(profile),
                Err(err) => {
                    warn!("persisted profile is malformed: {err}");
                    Stored::Corrupt(err.to_string())
                }
            },
            Ok(None) => Stored::Absent,
            Err(err) => {
                warn!("failed to read persisted profile: {err}");
                Stored::Corrupt(err.to_string())
            }
        }
    }

    /// Token presence as last observed by this store, without touching storage.
    /// Reports `false` until a read or write has primed it.
    pub fn has_token(&self) -> bool {
        self.lock().token_present.unwrap_or(false)
    }
}
