//! relay CLI: run the Telegram client ↔ manager relay. Config from env and optional CLI args.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use relay_cli::{load_config, Cli, Commands, RelayConfig};
use relay_engine::{build_router, Dispatcher};
use relay_telegram::{build_bot, run_repl, TelegramTransport};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run(config).await
        }
    }
}

/// Init logging, wire transport → router → dispatcher, then run the REPL until shutdown.
async fn run(config: RelayConfig) -> Result<()> {
    if let Some(dir) = Path::new(&config.log_file).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        }
    }
    relay_core::init_tracing(&config.log_file)?;

    info!(
        manager_group = %config.manager_group_id,
        relay_mode = ?config.relay_mode,
        log_file = %config.log_file,
        "Starting relay bot"
    );

    let bot = build_bot(&config);
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let router = Arc::new(build_router(
        transport,
        config.manager_group_id,
        config.relay_mode,
    ));
    let dispatcher = Arc::new(Dispatcher::new(router));

    run_repl(bot, dispatcher, config.manager_group_id).await
}
