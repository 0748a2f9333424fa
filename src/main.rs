use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use dadderup::cli::{self, AdminContext};
use dadderup::commands::Commands;

#[derive(Parser)]
#[command(name = "dadderup")]
#[command(about = "DadderUp admin - challenges, badges and plan cards")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.dadderup/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the admin database (overrides store.database_path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let open = || AdminContext::open(cli.config.as_ref(), cli.db.as_ref());

    match cli.command {
        Commands::Init { force } => cli::init::init_command(cli.config.clone(), force)?,
        Commands::Challenge { command } => cli::challenge::challenge_command(&open()?, command)?,
        Commands::Badge { command } => cli::badge::badge_command(&open()?, command)?,
        Commands::Plan { command } => cli::plan::plan_command(&open()?, command)?,
        Commands::Reaction { command } => cli::reaction::reaction_command(&open()?, command)?,
        Commands::Config { command } => cli::config::config_command(cli.config.clone(), command)?,
        Commands::Watch { interval } => cli::watch::watch_command(&open()?, interval).await?,
    }

    Ok(())
}
