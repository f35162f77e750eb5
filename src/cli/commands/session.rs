use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";

pub const ARG_USERNAME: &str = "username";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";

fn username_arg() -> Arg {
    Arg::new(ARG_USERNAME)
        .short('u')
        .long(ARG_USERNAME)
        .help("Account username")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("AUTHCONSOLE_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in and persist the session")
                .arg(username_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account and sign in")
                .arg(username_arg())
                .arg(
                    Arg::new(ARG_EMAIL)
                        .short('e')
                        .long(ARG_EMAIL)
                        .help("Account email address")
                        .required(true),
                )
                .arg(password_arg())
                .arg(
                    Arg::new(ARG_CONFIRM_PASSWORD)
                        .long(ARG_CONFIRM_PASSWORD)
                        .help("Repeat the password")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Forget the persisted session"))
        .subcommand(Command::new(CMD_WHOAMI).about("Show the signed-in user"))
}
