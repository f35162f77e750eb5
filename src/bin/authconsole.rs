use anyhow::Result;
use authconsole::cli::start;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Parse arguments, set up logging and build the action
    let action = start()?;

    // Handle the action
    action.execute().await
}
