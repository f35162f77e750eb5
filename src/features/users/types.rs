use crate::features::auth::Role;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A user as returned by the admin service. Treated as a disposable local copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub enabled: bool,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Full body for the update endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub enabled: bool,
}

impl From<&AdminUserRecord> for UserUpdate {
    fn from(record: &AdminUserRecord) -> Self {
        Self {
            username: record.username.clone(),
            email: record.email.clone(),
            role: record.role,
            enabled: record.enabled,
        }
    }
}

/// Fields an operator changed on the edit screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub enabled: Option<bool>,
}

impl UserChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.role.is_none() && self.enabled.is_none()
    }

    /// Merges the changes over the current record.
    #[must_use]
    pub fn apply_to(&self, current: &AdminUserRecord) -> UserUpdate {
        let mut update = UserUpdate::from(current);
        if let Some(username) = &self.username {
            update.username.clone_from(username);
        }
        if let Some(email) = &self.email {
            update.email.clone_from(email);
        }
        if let Some(role) = self.role {
            update.role = role;
        }
        if let Some(enabled) = self.enabled {
            update.enabled = enabled;
        }
        update
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordRequest<'a> {
    pub new_password: &'a str,
}
