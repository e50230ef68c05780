//! REPL runner: converts teloxide messages to [`InboundEvent`]s and hands them to the
//! [`Dispatcher`]. On shutdown the client queues are drained before returning.

use crate::adapters::TelegramMessageWrapper;
use crate::config::RelayConfig;
use anyhow::Result;
use relay_core::ChatId;
use relay_engine::Dispatcher;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, instrument};

/// Builds the teloxide Bot from config, applying the API URL override when it parses.
pub fn build_bot(config: &RelayConfig) -> Bot {
    let bot = Bot::new(config.bot_token.clone());
    match config.telegram_api_url {
        Some(ref url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

/// Starts the REPL. Each message is classified by origin and dispatched; messages that are
/// neither from a client nor from a manager topic are skipped.
#[instrument(skip(bot, dispatcher))]
pub async fn run_repl(bot: Bot, dispatcher: Arc<Dispatcher>, group: ChatId) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            username = ?me.user.username,
            manager_group = %group,
            "Bot connected"
        ),
        Err(e) => error!(error = %e, "get_me failed, continuing"),
    }

    let queue = dispatcher.clone();
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let dispatcher = queue.clone();

        async move {
            match TelegramMessageWrapper(&msg).to_inbound(group) {
                Some(event) => {
                    info!(
                        chat_id = msg.chat.id.0,
                        message_id = msg.id.0,
                        has_text = event.text().is_some(),
                        "Received message"
                    );
                    dispatcher.dispatch(event).await;
                }
                None => {
                    debug!(chat_id = msg.chat.id.0, message_id = msg.id.0, "Skipping update");
                }
            }
            Ok(())
        }
    })
    .await;

    info!("REPL stopped, draining client queues");
    dispatcher.close().await;
    Ok(())
}
