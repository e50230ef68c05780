//! Core types: identifiers, message content, inbound events, send options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// End-user identity. For Telegram this is the user id, which is also the private chat id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub i64);

/// Sub-conversation inside the manager group (Telegram forum topic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadId(pub i32);

/// Transport endpoint (chat) identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ClientId> for ChatId {
    fn from(client: ClientId) -> Self {
        ChatId(client.0)
    }
}

/// A message already delivered to some chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat: ChatId,
    pub message_id: i32,
}

/// Where to send: a chat, optionally a thread inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub chat: ChatId,
    pub thread: Option<ThreadId>,
}

impl Endpoint {
    /// Endpoint for a client's private chat.
    pub fn client(client: ClientId) -> Self {
        Self {
            chat: client.into(),
            thread: None,
        }
    }

    /// Endpoint for a thread inside the manager group.
    pub fn thread(group: ChatId, thread: ThreadId) -> Self {
        Self {
            chat: group,
            thread: Some(thread),
        }
    }
}

/// Media kinds that can be re-sent by file reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Document,
}

/// Message body. The text or caption is carried separately on the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    Text,
    Photo { file_id: String },
    Document { file_id: String },
    /// Any other media (sticker, voice, video, ...); `kind` is informational only.
    Other { kind: String },
}

impl Content {
    /// True for photo or document attachments.
    pub fn is_attachment(&self) -> bool {
        matches!(self, Content::Photo { .. } | Content::Document { .. })
    }

    /// Short name for logging.
    pub fn kind(&self) -> &str {
        match self {
            Content::Text => "text",
            Content::Photo { .. } => "photo",
            Content::Document { .. } => "document",
            Content::Other { kind } => kind,
        }
    }
}

/// How a client presents itself; used for thread labels and the new-client notice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDisplay {
    pub username: Option<String>,
    pub full_name: String,
}

/// Message written by a client in its private chat with the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    pub client: ClientId,
    pub display: ClientDisplay,
    pub message: MessageRef,
    pub content: Content,
    /// Message text or media caption.
    pub text: Option<String>,
}

/// Message written by a manager inside a thread of the manager group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerMessage {
    pub thread: ThreadId,
    pub message: MessageRef,
    pub content: Content,
    pub text: Option<String>,
}

/// Everything the router reacts to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InboundEvent {
    Client(ClientMessage),
    Manager(ManagerMessage),
}

impl InboundEvent {
    pub fn text(&self) -> Option<&str> {
        match self {
            InboundEvent::Client(m) => m.text.as_deref(),
            InboundEvent::Manager(m) => m.text.as_deref(),
        }
    }
}

/// Custom keyboard attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyboard {
    /// One row of reply buttons.
    Choice(Vec<String>),
    /// Removes any custom keyboard shown to the user.
    Remove,
}

/// Options for [`Transport::send_message`](crate::Transport::send_message).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOptions {
    pub keyboard: Option<Keyboard>,
    /// Render text as HTML.
    pub html: bool,
}

impl SendOptions {
    pub fn with_keyboard(keyboard: Keyboard) -> Self {
        Self {
            keyboard: Some(keyboard),
            html: false,
        }
    }

    pub fn html() -> Self {
        Self {
            keyboard: None,
            html: true,
        }
    }
}
