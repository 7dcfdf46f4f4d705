use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Log to ~/.remindr/remindr.log so output does not tear up the full-screen UI
pub fn init_file(config: &Config) -> Result<()> {
    let dir = Config::home_dir()?;
    fs::create_dir_all(&dir).context("Failed to create .remindr directory")?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("remindr.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Log to stderr for one-shot commands
pub fn init_stderr(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .init();
}
