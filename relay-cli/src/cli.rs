//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use relay_telegram::RelayConfig;

#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(about = "Telegram client ↔ manager relay bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the relay bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

/// Load and validate RelayConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<RelayConfig> {
    let config = RelayConfig::load(token)?;
    config.validate()?;
    Ok(config)
}
