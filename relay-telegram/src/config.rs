//! Relay config: token, manager group, optional API URL, log file path, relay mode.
//! Loaded from env: BOT_TOKEN, MANAGER_GROUP_ID, TELEGRAM_API_URL (or TELOXIDE_API_URL), LOG_FILE,
//! RELAY_MODE.

use relay_core::{ChatId, RelayError, Result};
use relay_engine::RelayMode;
use std::env;

pub const DEFAULT_LOG_FILE: &str = "logs/relay-bot.log";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// MANAGER_GROUP_ID: forum supergroup where client threads live
    pub manager_group_id: ChatId,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub log_file: String,
    pub relay_mode: RelayMode,
}

impl RelayConfig {
    /// Loads from env. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| RelayError::Config("BOT_TOKEN not set".into()))?,
        };
        let group_raw = env::var("MANAGER_GROUP_ID")
            .map_err(|_| RelayError::Config("MANAGER_GROUP_ID not set".into()))?;
        let manager_group_id = group_raw.trim().parse::<i64>().map(ChatId).map_err(|_| {
            RelayError::Config(format!(
                "MANAGER_GROUP_ID is not a chat id: {}",
                group_raw
            ))
        })?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let relay_mode = match env::var("RELAY_MODE") {
            Ok(mode) => mode.parse()?,
            Err(_) => RelayMode::default(),
        };

        Ok(Self {
            bot_token,
            manager_group_id,
            telegram_api_url,
            log_file,
            relay_mode,
        })
    }

    /// Validate config (telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                return Err(RelayError::Config(format!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                )));
            }
        }
        Ok(())
    }
}
