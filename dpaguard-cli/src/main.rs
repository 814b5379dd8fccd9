//! DPA Guard CLI
//!
//! Command-line interface for submitting data processing agreements to the
//! DPA Guard review API and following their analysis.

mod clipboard;
mod commands;
mod config;
mod render;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dpaguard")]
#[command(about = "DPA Guard review CLI", long_about = None)]
struct Cli {
    /// Review API URL
    #[arg(
        long,
        global = true,
        env = "DPAGUARD_API_URL",
        default_value = "http://localhost:8000"
    )]
    api_url: String,

    /// Log tracker and client activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "dpaguard=debug"
    } else {
        "dpaguard=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        api_url: cli.api_url,
    };

    handle_command(cli.command, &config).await
}
