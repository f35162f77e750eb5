use std::time::Duration;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// How startup reconciliation treats a validate call that neither accepted nor
/// rejected the token (network failure or server error).
///
/// A definitive rejection always clears the stored credentials, and an
/// inconclusive answer never yields an authenticated session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Any failure counts as "not valid": stored credentials are cleared.
    #[default]
    ClearOnFailure,
    /// Retry `attempts` more times with a fixed delay. If still inconclusive,
    /// the session is anonymous but stored credentials are kept for the next start.
    RetryThenKeep { attempts: u32, delay: Duration },
}

impl ValidationPolicy {
    #[must_use]
    pub const fn retry(attempts: u32) -> Self {
        Self::RetryThenKeep {
            attempts,
            delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Parses the configured policy name: `clear` or `retry`.
    ///
    /// # Errors
    /// Returns an error message for unknown names.
    pub fn from_name(name: &str, attempts: u32) -> Result<Self, String> {
        match name.trim().to_lowercase().as_str() {
            "clear" => Ok(Self::ClearOnFailure),
            "retry" => Ok(Self::retry(attempts)),
            other => Err(format!(
                "unknown validation policy {other:?}, expected clear or retry"
            )),
        }
    }

    pub(crate) const fn extra_attempts(&self) -> u32 {
        match self {
            Self::ClearOnFailure => 0,
            Self::RetryThenKeep { attempts, .. } => *attempts,
        }
    }

    pub(crate) const fn retry_delay(&self) -> Duration {
        match self {
            Self::ClearOnFailure => Duration::ZERO,
            Self::RetryThenKeep { delay, .. } => *delay,
        }
    }

    pub(crate) const fn keeps_credentials_when_unknown(&self) -> bool {
        matches!(self, Self::RetryThenKeep { .. })
    }
}
