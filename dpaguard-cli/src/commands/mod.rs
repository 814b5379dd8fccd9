//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod health;
mod review;
mod watch;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;
use review::ReviewCommands;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check that the review API is up
    Health,
    /// Review management
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Health => health::handle_health_command(config).await,
        Commands::Review { command } => review::handle_review_command(command, config).await,
    }
}
