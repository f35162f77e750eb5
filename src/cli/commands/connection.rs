use crate::{common::ConfigOverrides, features::session::ValidationPolicy};
use clap::{Arg, ArgMatches, Command};

pub const ARG_AUTH_URL: &str = "auth-url";
pub const ARG_ADMIN_URL: &str = "admin-url";
pub const ARG_STATE_DIR: &str = "state-dir";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_VALIDATE_POLICY: &str = "validate-policy";
pub const ARG_VALIDATE_RETRIES: &str = "validate-retries";

/// Collect connection overrides from matches.
///
/// # Errors
/// Returns an error if the validation policy is unknown.
pub fn parse(matches: &ArgMatches) -> anyhow::Result<ConfigOverrides> {
    // Blank env values fall back to defaults.
    let get_non_empty = |id: &str| {
        matches
            .get_one::<String>(id)
            .cloned()
            .filter(|v| !v.trim().is_empty())
    };

    let retries = matches
        .get_one::<u32>(ARG_VALIDATE_RETRIES)
        .copied()
        .unwrap_or(3);
    let validation_policy = get_non_empty(ARG_VALIDATE_POLICY)
        .map(|name| ValidationPolicy::from_name(&name, retries))
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(ConfigOverrides {
        auth_base_url: get_non_empty(ARG_AUTH_URL),
        admin_base_url: get_non_empty(ARG_ADMIN_URL),
        state_dir: get_non_empty(ARG_STATE_DIR),
        timeout_secs: matches.get_one::<u64>(ARG_TIMEOUT).copied(),
        validation_policy,
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH_URL)
                .long(ARG_AUTH_URL)
                .help("Auth service base URL (default: http://localhost:8081)")
                .env("AUTHCONSOLE_AUTH_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_ADMIN_URL)
                .long(ARG_ADMIN_URL)
                .help("Admin service base URL (default: http://localhost:8082)")
                .env("AUTHCONSOLE_ADMIN_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long(ARG_STATE_DIR)
                .help("Directory holding the persisted session")
                .env("AUTHCONSOLE_STATE_DIR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("HTTP request timeout in seconds")
                .env("AUTHCONSOLE_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_VALIDATE_POLICY)
                .long(ARG_VALIDATE_POLICY)
                .help("What to do with a stored token the auth service could not check: clear or retry")
                .env("AUTHCONSOLE_VALIDATE_POLICY")
                .global(true)
                .default_value("clear"),
        )
        .arg(
            Arg::new(ARG_VALIDATE_RETRIES)
                .long(ARG_VALIDATE_RETRIES)
                .help("Extra validation attempts when the policy is retry")
                .env("AUTHCONSOLE_VALIDATE_RETRIES")
                .global(true)
                .default_value("3")
                .value_parser(clap::value_parser!(u32)),
        )
}
