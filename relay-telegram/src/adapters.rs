//! Adapters from Telegram (teloxide) types to relay_core types.
//! Depends only on teloxide and relay_core type definitions.

use relay_core::{
    ChatId, ClientDisplay, ClientId, ClientMessage, Content, InboundEvent, ManagerMessage,
    MessageRef, ThreadId,
};
use teloxide::types::{MediaKind, MessageKind};

/// Wraps a teloxide User for conversion to [`ClientDisplay`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn client_id(&self) -> ClientId {
        ClientId(self.0.id.0 as i64)
    }

    pub fn to_display(&self) -> ClientDisplay {
        ClientDisplay {
            username: self.0.username.clone(),
            full_name: self.0.full_name(),
        }
    }
}

/// Wraps a teloxide Message for conversion to [`InboundEvent`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    /// Classifies the message by origin.
    ///
    /// Private chat with a human → client event. Topic message in `group` from a human, or from
    /// an anonymous admin posting as the group itself → manager event. Other bot-authored
    /// messages (including the relay's own), service messages and anything else → `None`.
    pub fn to_inbound(&self, group: ChatId) -> Option<InboundEvent> {
        let msg = self.0;
        let from = msg.from.as_ref()?;
        let as_group = msg
            .sender_chat
            .as_ref()
            .map(|chat| chat.id.0 == group.0)
            .unwrap_or(false);
        if from.is_bot && !as_group {
            return None;
        }
        let content = self.content()?;
        let text = msg.text().or_else(|| msg.caption()).map(str::to_string);
        let message = MessageRef {
            chat: ChatId(msg.chat.id.0),
            message_id: msg.id.0,
        };

        if msg.chat.is_private() {
            let user = TelegramUserWrapper(from);
            return Some(InboundEvent::Client(ClientMessage {
                client: user.client_id(),
                display: user.to_display(),
                message,
                content,
                text,
            }));
        }

        if msg.chat.id.0 == group.0 {
            let thread = msg.thread_id?;
            return Some(InboundEvent::Manager(ManagerMessage {
                thread: ThreadId(thread.0 .0),
                message,
                content,
                text,
            }));
        }

        None
    }

    /// Message body; `None` for service messages (topic created, member joined, ...).
    fn content(&self) -> Option<Content> {
        let MessageKind::Common(common) = &self.0.kind else {
            return None;
        };
        let content = match &common.media_kind {
            MediaKind::Text(_) => Content::Text,
            MediaKind::Photo(photo) => Content::Photo {
                file_id: photo.photo.last()?.file.id.0.clone(),
            },
            MediaKind::Document(doc) => Content::Document {
                file_id: doc.document.file.id.0.clone(),
            },
            MediaKind::Sticker(_) => Content::Other {
                kind: "sticker".to_string(),
            },
            MediaKind::Voice(_) => Content::Other {
                kind: "voice".to_string(),
            },
            MediaKind::Video(_) => Content::Other {
                kind: "video".to_string(),
            },
            MediaKind::Contact(_) => Content::Other {
                kind: "contact".to_string(),
            },
            MediaKind::Location(_) => Content::Other {
                kind: "location".to_string(),
            },
            _ => Content::Other {
                kind: "media".to_string(),
            },
        };
        Some(content)
    }
}
