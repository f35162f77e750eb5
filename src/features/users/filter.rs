use super::types::AdminUserRecord;

/// Case-insensitive substring match on username or email. A blank term keeps
/// every user; order is preserved.
#[must_use]
pub fn filter_users<'a>(users: &'a [AdminUserRecord], term: &str) -> Vec<&'a AdminUserRecord> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return users.iter().collect();
    }

    users
        .iter()
        .filter(|user| {
            user.username.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::auth::Role;
    use chrono::NaiveDate;

    fn user(id: i64, username: &str, email: &str) -> AdminUserRecord {
        AdminUserRecord {
            id,
            username: username.to_string(),
            email: email.to_string(),
            role: Role::User,
            enabled: true,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .unwrap(),
            updated_at: None,
        }
    }

    fn ids(users: &[&AdminUserRecord]) -> Vec<i64> {
        users.iter().map(|user| user.id).collect()
    }

    #[test]
    fn matches_username_or_email_case_insensitively() {
        let users = vec![
            user(1, "Alice", "alice@x.com"),
            user(2, "bob", "BOB@corp.io"),
            user(3, "carol", "c@x.com"),
        ];

        assert_eq!(ids(&filter_users(&users, "ALI")), vec![1]);
        assert_eq!(ids(&filter_users(&users, "corp")), vec![2]);
        assert_eq!(ids(&filter_users(&users, "x.com")), vec![1, 3]);
        assert!(filter_users(&users, "zed").is_empty());
    }

    #[test]
    fn blank_term_returns_everything_in_order() {
        let users = vec![user(2, "bob", "b@x.com"), user(1, "alice", "a@x.com")];
        assert_eq!(ids(&filter_users(&users, "   ")), vec![2, 1]);
        assert_eq!(ids(&filter_users(&users, "")), vec![2, 1]);
    }
}
