//! Cogito - rule-based conversational responder
//!
//! Main entry point for the Cogito application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cogito::cli::{Cli, Commands};
use cogito::commands;
use cogito::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve { host, port } => {
            tracing::info!("Starting HTTP chat server");
            commands::serve::run_serve(config, host, port).await?;
            Ok(())
        }
        Commands::Chat => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config)?;
            Ok(())
        }
        Commands::Ask { message } => {
            commands::ask::run_ask(config, &message)?;
            Ok(())
        }
        Commands::History { limit, keyword } => {
            commands::history::handle_history(&config, limit, keyword.as_deref())?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cogito=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
