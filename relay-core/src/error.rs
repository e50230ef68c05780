//! Error types for the relay.
//!
//! [`RelayError`] is the top-level error. Only [`RelayError::Config`] is fatal, and only at startup.

use crate::transport::TransportError;
use crate::types::{ClientId, ThreadId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    /// The transport could not open a thread for the client; the inbound message is dropped.
    #[error("Thread creation failed for client {client}: {source}")]
    ThreadCreationFailed {
        client: ClientId,
        #[source]
        source: TransportError,
    },

    /// A manager wrote in a thread the registry does not know.
    #[error("Unroutable thread: {0}")]
    UnroutableThread(ThreadId),

    #[error("Send failed: {0}")]
    TransportSendFailed(#[from] TransportError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for relay operations; uses [`RelayError`].
pub type Result<T> = std::result::Result<T, RelayError>;
