use crate::{
    cli::actions::output,
    common::AppConfig,
    features::auth::validation::{validate_login, validate_registration},
    Console,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Debug)]
pub enum Command {
    Login {
        username: String,
        password: SecretString,
    },
    Register {
        username: String,
        email: String,
        password: SecretString,
        confirmation: SecretString,
    },
    Logout,
    Whoami,
}

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub command: Command,
}

/// Execute a session command.
/// # Errors
/// Returns an error if input validation, the auth service or the state directory fails.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::new(&args.config).context("failed to start console")?;
    let session = console.session();

    match args.command {
        Command::Login { username, password } => {
            validate_login(&username, password.expose_secret())?;
            let profile = session
                .login(username.trim(), &password)
                .await
                .context("login failed")?;
            println!("{}", output::signed_in(&profile));
        }
        Command::Register {
            username,
            email,
            password,
            confirmation,
        } => {
            validate_registration(
                &username,
                &email,
                password.expose_secret(),
                confirmation.expose_secret(),
            )?;
            let profile = session
                .register(username.trim(), email.trim(), &password)
                .await
                .context("registration failed")?;
            println!("{}", output::signed_in(&profile));
        }
        Command::Logout => {
            session.logout();
            println!("Signed out.");
        }
        Command::Whoami => {
            let profile = console.require_session().await?;
            debug!(state = %session.state(), "dashboard");
            println!("{}", output::dashboard(&profile));
        }
    }

    Ok(())
}
