//! # relay-telegram
//!
//! Telegram layer of the manager relay: [`TelegramTransport`] implements [`relay_core::Transport`]
//! over teloxide forum topics, adapters turn updates into [`relay_core::InboundEvent`]s,
//! [`RelayConfig`] loads from env, and [`run_repl`] feeds the engine's dispatcher.

mod adapters;
mod config;
mod runner;
mod transport;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use config::{RelayConfig, DEFAULT_LOG_FILE};
pub use runner::{build_bot, run_repl};
pub use transport::{reply_markup, TelegramTransport};
