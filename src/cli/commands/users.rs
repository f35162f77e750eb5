use crate::features::auth::Role;
use clap::{Arg, ArgAction, Command};

pub const CMD_USERS: &str = "users";
pub const CMD_LIST: &str = "list";
pub const CMD_SHOW: &str = "show";
pub const CMD_UPDATE: &str = "update";
pub const CMD_DELETE: &str = "delete";
pub const CMD_ACTIVATE: &str = "activate";
pub const CMD_DEACTIVATE: &str = "deactivate";
pub const CMD_RESET_PASSWORD: &str = "reset-password";

pub const ARG_ID: &str = "id";
pub const ARG_SEARCH: &str = "search";
pub const ARG_USERNAME: &str = "username";
pub const ARG_EMAIL: &str = "email";
pub const ARG_ROLE: &str = "role";
pub const ARG_ENABLED: &str = "enabled";
pub const ARG_YES: &str = "yes";
pub const ARG_NEW_PASSWORD: &str = "new-password";

fn id_arg() -> Arg {
    Arg::new(ARG_ID)
        .help("User id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

#[must_use]
pub fn with_subcommand(command: Command) -> Command {
    command.subcommand(
        Command::new(CMD_USERS)
            .about("Manage users (admin only)")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(
                Command::new(CMD_LIST).about("List users").arg(
                    Arg::new(ARG_SEARCH)
                        .short('s')
                        .long(ARG_SEARCH)
                        .help("Only show users whose username or email contains this text"),
                ),
            )
            .subcommand(Command::new(CMD_SHOW).about("Show one user").arg(id_arg()))
            .subcommand(
                Command::new(CMD_UPDATE)
                    .about("Edit a user; unspecified fields keep their current value")
                    .arg(id_arg())
                    .arg(Arg::new(ARG_USERNAME).long(ARG_USERNAME).help("New username"))
                    .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL).help("New email address"))
                    .arg(
                        Arg::new(ARG_ROLE)
                            .long(ARG_ROLE)
                            .help("New role: USER or ADMIN")
                            .value_parser(|value: &str| value.parse::<Role>()),
                    )
                    .arg(
                        Arg::new(ARG_ENABLED)
                            .long(ARG_ENABLED)
                            .help("Enable or disable the account")
                            .value_parser(clap::value_parser!(bool)),
                    ),
            )
            .subcommand(
                Command::new(CMD_DELETE)
                    .about("Delete a user")
                    .arg(id_arg())
                    .arg(
                        Arg::new(ARG_YES)
                            .long(ARG_YES)
                            .help("Confirm the deletion")
                            .action(ArgAction::SetTrue),
                    ),
            )
            .subcommand(Command::new(CMD_ACTIVATE).about("Enable a user").arg(id_arg()))
            .subcommand(
                Command::new(CMD_DEACTIVATE)
                    .about("Disable a user")
                    .arg(id_arg()),
            )
            .subcommand(
                Command::new(CMD_RESET_PASSWORD)
                    .about("Set a new password for a user")
                    .arg(id_arg())
                    .arg(
                        Arg::new(ARG_NEW_PASSWORD)
                            .long(ARG_NEW_PASSWORD)
                            .help("The new password")
                            .env("AUTHCONSOLE_NEW_PASSWORD")
                            .hide_env_values(true)
                            .required(true),
                    ),
            ),
    )
}
