//! Terminal rendering for command results. Functions return strings so the
//! layout can be tested without capturing stdout.

use crate::features::{auth::UserProfile, users::AdminUserRecord};
use std::fmt::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[must_use]
pub fn signed_in(profile: &UserProfile) -> String {
    format!("Signed in as {} ({})", profile.username, profile.role)
}

#[must_use]
pub fn dashboard(profile: &UserProfile) -> String {
    let mut out = format!(
        "Welcome, {}!\n  Username: {}\n  Email:    {}\n  Role:     {}",
        profile.username, profile.username, profile.email, profile.role
    );
    if profile.is_admin() {
        out.push_str("\n\nAdmin tools: authconsole users --help");
    }
    out
}

fn status(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[must_use]
pub fn users_table(users: &[&AdminUserRecord]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let name_width = users
        .iter()
        .map(|user| user.username.chars().count())
        .chain(std::iter::once("USERNAME".len()))
        .max()
        .unwrap_or_default();
    let email_width = users
        .iter()
        .map(|user| user.email.chars().count())
        .chain(std::iter::once("EMAIL".len()))
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "{:>6}  {:<name_width$}  {:<email_width$}  {:<5}  {:<8}  CREATED",
        "ID", "USERNAME", "EMAIL", "ROLE", "STATUS"
    );
    for user in users {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "\n{:>6}  {:<name_width$}  {:<email_width$}  {:<5}  {:<8}  {}",
            user.id,
            user.username,
            user.email,
            user.role.as_str(),
            status(user.enabled),
            user.created_at.format(TIMESTAMP_FORMAT)
        );
    }
    out
}

#[must_use]
pub fn user_detail(user: &AdminUserRecord) -> String {
    let updated = user
        .updated_at
        .map_or_else(|| "-".to_string(), |at| at.format(TIMESTAMP_FORMAT).to_string());
    format!(
        "ID:       {}\nUsername: {}\nEmail:    {}\nRole:     {}\nStatus:   {}\nCreated:  {}\nUpdated:  {}",
        user.id,
        user.username,
        user.email,
        user.role,
        status(user.enabled),
        user.created_at.format(TIMESTAMP_FORMAT),
        updated
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::auth::Role;
    use chrono::NaiveDate;

    fn record(id: i64, username: &str, enabled: bool) -> AdminUserRecord {
        AdminUserRecord {
            id,
            username: username.to_string(),
            email: format!("{username}@x.com"),
            role: Role::User,
            enabled,
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|date| date.and_hms_opt(10, 15, 0))
                .unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn dashboard_shows_admin_hint_only_for_admins() {
        let mut profile = UserProfile {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            role: Role::User,
        };
        assert!(!dashboard(&profile).contains("Admin tools"));

        profile.role = Role::Admin;
        let text = dashboard(&profile);
        assert!(text.starts_with("Welcome, alice!"));
        assert!(text.contains("Role:     ADMIN"));
        assert!(text.contains("Admin tools"));
    }

    #[test]
    fn users_table_lists_each_user() {
        let alice = record(1, "alice", true);
        let bob = record(22, "bob", false);
        let text = users_table(&[&alice, &bob]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("USERNAME"));
        assert!(lines[1].contains("alice@x.com"));
        assert!(lines[1].contains("enabled"));
        assert!(lines[2].contains("disabled"));
        assert!(lines[2].ends_with("2024-03-01 10:15"));
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(users_table(&[]), "No users found.");
    }

    #[test]
    fn detail_marks_missing_update_time() {
        let text = user_detail(&record(5, "carol", true));
        assert!(text.contains("Updated:  -"));
        assert!(text.contains("Username: carol"));
    }
}
