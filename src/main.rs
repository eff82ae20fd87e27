use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{
    ConfigCommand, DeleteCommand, LogCommand, PlansCommand, SyncCommand, TodayCommand, WeekCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "caltrax")]
#[command(version)]
#[command(about = "Calorie and macro tracking with remote sync", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull food entries and plans from the remote store
    Sync(SyncCommand),

    /// Log a food entry for today
    Log(LogCommand),

    /// Delete a logged food entry
    Delete(DeleteCommand),

    /// Show today's entries and totals
    Today(TodayCommand),

    /// Show this week's totals
    Week(WeekCommand),

    /// List cached workout or meal plans
    Plans(PlansCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caltrax=info,caltrax_core=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Sync(cmd)) => cmd.run(&config).await?,
        Some(Commands::Log(cmd)) => cmd.run(&config).await?,
        Some(Commands::Delete(cmd)) => cmd.run(&config).await?,
        Some(Commands::Today(cmd)) => cmd.run(&config).await?,
        Some(Commands::Week(cmd)) => cmd.run(&config).await?,
        Some(Commands::Plans(cmd)) => cmd.run(&config).await?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
