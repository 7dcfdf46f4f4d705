use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod api;
mod app;
mod client;
mod commands;
mod config;
mod events;
mod logging;
mod session;
mod ui;

use config::{Config, Profile};

#[derive(Parser)]
#[command(name = "remindr")]
#[command(version)]
#[command(about = "Chat with your reminder assistant from the terminal", long_about = None)]
struct Cli {
    /// Base URL of the assistant service (overrides config and REMINDR_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Backend generation to talk to
    #[arg(long, global = true, value_enum)]
    profile: Option<Profile>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single chat message and print the reply
    Chat {
        message: String,
        /// Use general chat instead of the reminder assistant
        #[arg(long)]
        general: bool,
    },
    /// List reminders
    Reminders {
        /// Only reminders on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Show completed reminders instead of open ones
        #[arg(long)]
        completed: bool,
    },
    /// List reminders for today and tomorrow
    Upcoming,
    /// Mark a reminder as completed
    Complete { id: i64 },
    /// Delete a reminder
    Delete { id: i64 },
    /// Show a conversation's metadata
    Conversation { id: String },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the effective config to ~/.remindr/config.toml
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
}

fn effective_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(profile) = cli.profile {
        config = profile.apply(config);
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint_base = endpoint.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    let Some(command) = cli.command else {
        logging::init_file(&config)?;
        return app::run(config).await;
    };

    logging::init_stderr(&config);
    match command {
        Commands::Chat { message, general } => commands::chat(config, &message, general).await,
        Commands::Reminders { date, completed } => commands::reminders(config, date, completed).await,
        Commands::Upcoming => commands::upcoming(config).await,
        Commands::Complete { id } => commands::complete(config, id).await,
        Commands::Delete { id } => commands::delete(config, id).await,
        Commands::Conversation { id } => commands::conversation(config, &id).await,
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config_init(force),
            ConfigAction::Show => commands::config_show(&config),
        },
    }
}
