//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an action carrying the loaded configuration
//! and the parsed command. Nothing here touches the network or the state
//! directory.

use crate::cli::actions::{session, users, Action};
use crate::cli::commands::{connection, session as session_cmd, users as users_cmd};
use crate::common::AppConfig;
use crate::features::users::UserChanges;
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    required(matches, id).map(SecretString::from)
}

fn user_id(matches: &ArgMatches) -> Result<i64> {
    matches
        .get_one::<i64>(users_cmd::ARG_ID)
        .copied()
        .context("missing required argument: ID")
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if the configuration is invalid or arguments are missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let overrides = connection::parse(matches)?;
    let config = AppConfig::load(overrides).context("invalid configuration")?;

    let action = match matches.subcommand() {
        Some((session_cmd::CMD_LOGIN, sub)) => Action::Session(session::Args {
            config,
            command: session::Command::Login {
                username: required(sub, session_cmd::ARG_USERNAME)?,
                password: secret(sub, session_cmd::ARG_PASSWORD)?,
            },
        }),
        Some((session_cmd::CMD_REGISTER, sub)) => Action::Session(session::Args {
            config,
            command: session::Command::Register {
                username: required(sub, session_cmd::ARG_USERNAME)?,
                email: required(sub, session_cmd::ARG_EMAIL)?,
                password: secret(sub, session_cmd::ARG_PASSWORD)?,
                confirmation: secret(sub, session_cmd::ARG_CONFIRM_PASSWORD)?,
            },
        }),
        Some((session_cmd::CMD_LOGOUT, _)) => Action::Session(session::Args {
            config,
            command: session::Command::Logout,
        }),
        Some((session_cmd::CMD_WHOAMI, _)) => Action::Session(session::Args {
            config,
            command: session::Command::Whoami,
        }),
        Some((users_cmd::CMD_USERS, sub)) => Action::Users(users::Args {
            config,
            command: users_command(sub)?,
        }),
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("missing command, see --help"),
    };

    Ok(action)
}

fn users_command(matches: &ArgMatches) -> Result<users::Command> {
    let command = match matches.subcommand() {
        Some((users_cmd::CMD_LIST, sub)) => users::Command::List {
            search: sub.get_one::<String>(users_cmd::ARG_SEARCH).cloned(),
        },
        Some((users_cmd::CMD_SHOW, sub)) => users::Command::Show { id: user_id(sub)? },
        Some((users_cmd::CMD_UPDATE, sub)) => users::Command::Update {
            id: user_id(sub)?,
            changes: UserChanges {
                username: sub.get_one::<String>(users_cmd::ARG_USERNAME).cloned(),
                email: sub.get_one::<String>(users_cmd::ARG_EMAIL).cloned(),
                role: sub.get_one(users_cmd::ARG_ROLE).copied(),
                enabled: sub.get_one::<bool>(users_cmd::ARG_ENABLED).copied(),
            },
        },
        Some((users_cmd::CMD_DELETE, sub)) => users::Command::Delete {
            id: user_id(sub)?,
            confirmed: sub.get_flag(users_cmd::ARG_YES),
        },
        Some((users_cmd::CMD_ACTIVATE, sub)) => users::Command::Activate { id: user_id(sub)? },
        Some((users_cmd::CMD_DEACTIVATE, sub)) => {
            users::Command::Deactivate { id: user_id(sub)? }
        }
        Some((users_cmd::CMD_RESET_PASSWORD, sub)) => users::Command::ResetPassword {
            id: user_id(sub)?,
            new_password: secret(sub, users_cmd::ARG_NEW_PASSWORD)?,
        },
        Some((other, _)) => bail!("unknown users command: {other}"),
        None => bail!("missing users command, see authconsole users --help"),
    };

    Ok(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::{auth::Role, session::ValidationPolicy};
    use secrecy::ExposeSecret;
    use std::time::Duration;

    fn matches_from(args: &[&str]) -> ArgMatches {
        crate::cli::commands::new().get_matches_from(args)
    }

    fn with_clean_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(
            [
                ("AUTHCONSOLE_AUTH_URL", None::<&str>),
                ("AUTHCONSOLE_ADMIN_URL", None),
                ("AUTHCONSOLE_STATE_DIR", Some("/tmp/authconsole-test")),
                ("AUTHCONSOLE_TIMEOUT", None),
                ("AUTHCONSOLE_VALIDATE_POLICY", None),
                ("AUTHCONSOLE_VALIDATE_RETRIES", None),
                ("AUTHCONSOLE_PASSWORD", None),
                ("AUTHCONSOLE_NEW_PASSWORD", None),
            ],
            f,
        );
    }

    #[test]
    fn login_builds_session_action_with_defaults() {
        with_clean_env(|| {
            let action =
                handler(&matches_from(&["authconsole", "login", "-u", "alice", "-p", "pw"])).unwrap();

            let Action::Session(args) = action else {
                panic!("expected session action");
            };
            assert_eq!(args.config.auth_base_url.as_str(), "http://localhost:8081/");
            assert_eq!(args.config.admin_base_url.as_str(), "http://localhost:8082/");
            assert_eq!(args.config.request_timeout, Duration::from_secs(10));
            assert_eq!(args.config.validation_policy, ValidationPolicy::ClearOnFailure);
            let session::Command::Login { username, password } = args.command else {
                panic!("expected login");
            };
            assert_eq!(username, "alice");
            assert_eq!(password.expose_secret(), "pw");
        });
    }

    #[test]
    fn env_overrides_are_applied() {
        temp_env::with_vars(
            [
                ("AUTHCONSOLE_AUTH_URL", Some("https://auth.tld")),
                ("AUTHCONSOLE_ADMIN_URL", Some("  ")),
                ("AUTHCONSOLE_STATE_DIR", Some("/tmp/authconsole-test")),
                ("AUTHCONSOLE_TIMEOUT", Some("4")),
                ("AUTHCONSOLE_VALIDATE_POLICY", Some("retry")),
                ("AUTHCONSOLE_VALIDATE_RETRIES", Some("5")),
            ],
            || {
                let action = handler(&matches_from(&["authconsole", "logout"])).unwrap();
                let Action::Session(args) = action else {
                    panic!("expected session action");
                };
                assert_eq!(args.config.auth_base_url.as_str(), "https://auth.tld/");
                assert_eq!(args.config.admin_base_url.as_str(), "http://localhost:8082/");
                assert_eq!(args.config.request_timeout, Duration::from_secs(4));
                assert_eq!(args.config.validation_policy, ValidationPolicy::retry(5));
            },
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        with_clean_env(|| {
            let result = handler(&matches_from(&[
                "authconsole",
                "--auth-url",
                "ftp://auth.tld",
                "logout",
            ]));
            assert!(result.is_err());
        });
    }

    #[test]
    fn unknown_policy_is_rejected() {
        with_clean_env(|| {
            let result = handler(&matches_from(&[
                "authconsole",
                "--validate-policy",
                "ignore",
                "logout",
            ]));
            assert!(result.is_err());
        });
    }

    #[test]
    fn users_update_collects_changes() {
        with_clean_env(|| {
            let action = handler(&matches_from(&[
                "authconsole",
                "users",
                "update",
                "7",
                "--email",
                "new@x.com",
                "--role",
                "ADMIN",
            ]))
            .unwrap();

            let Action::Users(args) = action else {
                panic!("expected users action");
            };
            let users::Command::Update { id, changes } = args.command else {
                panic!("expected update");
            };
            assert_eq!(id, 7);
            assert_eq!(
                changes,
                UserChanges {
                    email: Some("new@x.com".to_string()),
                    role: Some(Role::Admin),
                    ..UserChanges::default()
                }
            );
        });
    }

    #[test]
    fn users_delete_records_confirmation() {
        with_clean_env(|| {
            let action =
                handler(&matches_from(&["authconsole", "users", "delete", "3"])).unwrap();
            let Action::Users(args) = action else {
                panic!("expected users action");
            };
            assert!(matches!(
                args.command,
                users::Command::Delete { id: 3, confirmed: false }
            ));
        });
    }
}
