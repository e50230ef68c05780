//! # relay-cli
//!
//! CLI foundation for the relay binary: argument parsing and config loading.

pub mod cli;

pub use cli::{load_config, Cli, Commands};
pub use relay_telegram::RelayConfig;
