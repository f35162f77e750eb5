use crate::{
    cli::actions::output,
    common::AppConfig,
    features::{
        auth::validation::{validate_email, validate_reset_password, validate_username},
        users::{filter_users, UserChanges},
    },
    Console,
};
use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub enum Command {
    List { search: Option<String> },
    Show { id: i64 },
    Update { id: i64, changes: UserChanges },
    Delete { id: i64, confirmed: bool },
    Activate { id: i64 },
    Deactivate { id: i64 },
    ResetPassword { id: i64, new_password: SecretString },
}

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub command: Command,
}

/// Checks local input before any request is made.
fn precheck(command: &Command) -> Result<()> {
    match command {
        Command::Update { changes, .. } => {
            if changes.is_empty() {
                bail!("nothing to update, pass at least one of --username, --email, --role, --enabled");
            }
            if let Some(username) = &changes.username {
                validate_username(username)?;
            }
            if let Some(email) = &changes.email {
                validate_email(email)?;
            }
        }
        Command::Delete { id, confirmed } if !*confirmed => {
            bail!("refusing to delete user {id} without --yes");
        }
        Command::ResetPassword { new_password, .. } => {
            validate_reset_password(new_password.expose_secret())?;
        }
        _ => {}
    }
    Ok(())
}

/// Execute a user management command.
/// # Errors
/// Returns an error if input validation, the session gate or the admin service fails.
pub async fn execute(args: Args) -> Result<()> {
    precheck(&args.command)?;

    let console = Console::new(&args.config).context("failed to start console")?;
    console.require_admin().await?;
    let admin = console.admin();

    match args.command {
        Command::List { search } => {
            let users = admin.list_users().await.context("failed to list users")?;
            let term = search.as_deref().unwrap_or_default();
            let visible = filter_users(&users, term);
            println!("{}", output::users_table(&visible));
        }
        Command::Show { id } => {
            let user = admin.get_user(id).await.context("failed to load user")?;
            println!("{}", output::user_detail(&user));
        }
        Command::Update { id, changes } => {
            let current = admin.get_user(id).await.context("failed to load user")?;
            let update = changes.apply_to(&current);
            let updated = admin
                .update_user(id, &update)
                .await
                .context("failed to update user")?;
            info!(id, "user updated");
            println!("{}", output::user_detail(&updated));
        }
        Command::Delete { id, .. } => {
            admin.delete_user(id).await.context("failed to delete user")?;
            println!("User {id} deleted.");
        }
        Command::Activate { id } => {
            admin
                .activate_user(id)
                .await
                .context("failed to activate user")?;
            println!("User {id} activated.");
        }
        Command::Deactivate { id } => {
            admin
                .deactivate_user(id)
                .await
                .context("failed to deactivate user")?;
            println!("User {id} deactivated.");
        }
        Command::ResetPassword { id, new_password } => {
            admin
                .reset_password(id, &new_password)
                .await
                .context("failed to reset password")?;
            println!("Password for user {id} reset.");
        }
    }

    Ok(())
}
