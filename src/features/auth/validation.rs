//! Client-side form validation. Violations block submission locally and never
//! reach the network. The password rules mirror the auth service policy so a
//! form can list every unmet rule before the server rejects the request.

use regex::Regex;
use std::{fmt, sync::LazyLock};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 100;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordRule {
    NotBlank,
    MinLength,
    MaxLength,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBlank => formatter.write_str("password cannot be empty"),
            Self::MinLength => write!(
                formatter,
                "must be at least {MIN_PASSWORD_LENGTH} characters long"
            ),
            Self::MaxLength => write!(
                formatter,
                "must not exceed {MAX_PASSWORD_LENGTH} characters"
            ),
            Self::Uppercase => formatter.write_str("must contain at least one uppercase letter"),
            Self::Lowercase => formatter.write_str("must contain at least one lowercase letter"),
            Self::Digit => formatter.write_str("must contain at least one digit"),
            Self::Special => formatter.write_str("must contain at least one special character"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("password does not meet the policy: {}", describe(.0))]
    WeakPassword(Vec<PasswordRule>),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("username must be between 3 and 50 characters")]
    Username,
    #[error("email address is not valid")]
    Email,
}

fn describe(rules: &[PasswordRule]) -> String {
    rules
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[allow(clippy::expect_used)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("static validation pattern must compile")
}

static UPPERCASE_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"[A-Z]"));
static LOWERCASE_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"[a-z]"));
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"[0-9]"));
static SPECIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));

/// Returns every password rule the candidate violates, in a fixed order.
/// A blank password only reports `NotBlank`.
#[must_use]
pub fn check_password(password: &str) -> Vec<PasswordRule> {
    if password.trim().is_empty() {
        return vec![PasswordRule::NotBlank];
    }

    let mut violations = Vec::new();
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        violations.push(PasswordRule::MinLength);
    }
    if length > MAX_PASSWORD_LENGTH {
        violations.push(PasswordRule::MaxLength);
    }
    if !UPPERCASE_RE.is_match(password) {
        violations.push(PasswordRule::Uppercase);
    }
    if !LOWERCASE_RE.is_match(password) {
        violations.push(PasswordRule::Lowercase);
    }
    if !DIGIT_RE.is_match(password) {
        violations.push(PasswordRule::Digit);
    }
    if !SPECIAL_RE.is_match(password) {
        violations.push(PasswordRule::Special);
    }

    violations
}

/// # Errors
/// Returns `WeakPassword` listing the violated rules.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let violations = check_password(password);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword(violations))
    }
}

/// # Errors
/// Returns `PasswordMismatch` when the confirmation differs.
pub fn confirm_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// # Errors
/// Returns `Username` when the trimmed length is outside 3..=50.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.trim().chars().count();
    if (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(ValidationError::Username)
    }
}

/// # Errors
/// Returns `Email` when the address is not of the form `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::Email)
    }
}

/// Login form: both fields must be present; the server judges the rest.
///
/// # Errors
/// Returns `Required` naming the first missing field.
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::Required("username"));
    }
    if password.is_empty() {
        return Err(ValidationError::Required("password"));
    }
    Ok(())
}

/// Registration form, checked in the order the operator sees the fields.
///
/// # Errors
/// Returns the first failing check.
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    validate_username(username)?;
    validate_email(email)?;
    confirm_password(password, confirmation)?;
    validate_password(password)
}

/// Admin password reset only enforces the minimum length.
///
/// # Errors
/// Returns `WeakPassword([MinLength])` for short passwords.
pub fn validate_reset_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::Required("new password"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::WeakPassword(vec![PasswordRule::MinLength]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_special_character_counts() {
        for special in r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#.chars() {
            let candidate = format!("Abcdefg1{special}");
            assert!(check_password(&candidate).is_empty(), "{candidate}");
        }
        assert_eq!(check_password("Abcdefg1~"), vec![PasswordRule::Special]);
    }

    #[test]
    fn email_pattern_accepts_and_rejects() {
        assert!(validate_email(" a@x.com ").is_ok());
        assert!(EMAIL_RE.is_match("first.last@sub.example.org"));
        assert!(!EMAIL_RE.is_match("a b@x.com"));
        assert_eq!(validate_email("a@x"), Err(ValidationError::Email));
    }

    #[test]
    fn short_password_fails_length_rule() {
        assert!(check_password("short").contains(&PasswordRule::MinLength));
    }

    #[test]
    fn lowercase_password_fails_uppercase_rule() {
        assert_eq!(
            check_password("alllowercase1!"),
            vec![PasswordRule::Uppercase]
        );
    }

    #[test]
    fn password_without_digits_fails_digit_rule() {
        assert_eq!(check_password("NoDigits!"), vec![PasswordRule::Digit]);
    }

    #[test]
    fn valid_password_passes_all_rules() {
        assert!(check_password("Valid1Pass!").is_empty());
        assert!(validate_password("Password123!").is_ok());
    }

    #[test]
    fn password_without_lowercase_or_special() {
        assert_eq!(check_password("PASSWORD123!"), vec![PasswordRule::Lowercase]);
        assert_eq!(check_password("Password123"), vec![PasswordRule::Special]);
    }

    #[test]
    fn blank_password_reports_only_not_blank() {
        assert_eq!(check_password(""), vec![PasswordRule::NotBlank]);
        assert_eq!(check_password("   "), vec![PasswordRule::NotBlank]);
    }

    #[test]
    fn overlong_password_fails_max_length() {
        let password = format!("{}a1!", "A".repeat(101));
        assert_eq!(check_password(&password), vec![PasswordRule::MaxLength]);
    }

    #[test]
    fn weak_password_error_lists_every_rule() {
        let err = validate_password("short").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("at least 8 characters"));
        assert!(message.contains("uppercase"));
        assert!(message.contains("digit"));
        assert!(message.contains("special character"));
    }

    #[test]
    fn registration_checks_fields_in_order() {
        assert_eq!(
            validate_registration("al", "a@x.com", "Valid1Pass!", "Valid1Pass!"),
            Err(ValidationError::Username)
        );
        assert_eq!(
            validate_registration("alice", "not-an-email", "Valid1Pass!", "Valid1Pass!"),
            Err(ValidationError::Email)
        );
        assert_eq!(
            validate_registration("alice", "a@x.com", "Valid1Pass!", "Valid1Pass?"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(matches!(
            validate_registration("alice", "a@x.com", "short", "short"),
            Err(ValidationError::WeakPassword(_))
        ));
        assert_eq!(
            validate_registration("alice", "a@x.com", "Valid1Pass!", "Valid1Pass!"),
            Ok(())
        );
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(
            validate_login("  ", "secret"),
            Err(ValidationError::Required("username"))
        );
        assert_eq!(
            validate_login("alice", ""),
            Err(ValidationError::Required("password"))
        );
        assert_eq!(validate_login("alice", "secret"), Ok(()));
    }

    #[test]
    fn reset_password_only_checks_length() {
        assert!(validate_reset_password("longenough").is_ok());
        assert_eq!(
            validate_reset_password("short"),
            Err(ValidationError::WeakPassword(vec![PasswordRule::MinLength]))
        );
        assert_eq!(
            validate_reset_password(""),
            Err(ValidationError::Required("new password"))
        );
    }

    #[test]
    fn username_and_email_bounds() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username(&"x".repeat(51)).is_err());
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("a@x").is_err());
        assert!(validate_email("a b@x.com").is_err());
    }
}
