//! Transport abstraction for sending, copying and forwarding messages and opening threads.
//!
//! [`Transport`] is transport-agnostic; the Telegram implementation lives in `relay-telegram`.

use crate::types::{ChatId, Endpoint, MediaKind, MessageRef, SendOptions, ThreadId};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a transport primitive. Never retried by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport error: {reason}")]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Capability set the relay engine consumes. Implementations map to a chat platform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a text message to the endpoint.
    async fn send_message(
        &self,
        target: &Endpoint,
        text: &str,
        options: &SendOptions,
    ) -> TransportResult<MessageRef>;

    /// Sends a photo or document by file reference, with an optional caption.
    async fn send_media(
        &self,
        target: &Endpoint,
        kind: MediaKind,
        file_id: &str,
        caption: Option<&str>,
    ) -> TransportResult<MessageRef>;

    /// Copies an existing message (without the "forwarded from" header) to the target.
    async fn copy_message(
        &self,
        from: ChatId,
        message_id: i32,
        to: &Endpoint,
    ) -> TransportResult<MessageRef>;

    /// Forwards an existing message to the target.
    async fn forward_message(
        &self,
        from: ChatId,
        message_id: i32,
        to: &Endpoint,
    ) -> TransportResult<MessageRef>;

    /// Creates a new sub-thread inside a group endpoint and returns its id.
    async fn create_sub_thread(&self, group: ChatId, label: &str) -> TransportResult<ThreadId>;
}
