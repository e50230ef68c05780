//! Wraps teloxide::Bot and implements [`relay_core::Transport`]. Threads are forum topics of the
//! manager group; tests substitute a recording transport.

use async_trait::async_trait;
use relay_core::{
    ChatId, Endpoint, Keyboard, MediaKind, MessageRef, SendOptions, ThreadId, Transport,
    TransportError, TransportResult,
};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId as TgChatId, FileId, InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove,
    MessageId, ParseMode, ReplyMarkup, ThreadId as TgThreadId,
};
use tracing::debug;

/// Thin wrapper around teloxide::Bot that implements the relay's Transport trait.
pub struct TelegramTransport {
    bot: teloxide::Bot,
}

impl TelegramTransport {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

fn tg_chat(chat: ChatId) -> TgChatId {
    TgChatId(chat.0)
}

fn tg_thread(thread: ThreadId) -> TgThreadId {
    TgThreadId(MessageId(thread.0))
}

fn transport_err(e: teloxide::RequestError) -> TransportError {
    TransportError::new(e.to_string())
}

/// Maps a relay keyboard to Telegram reply markup: one resized, one-time row, or removal.
pub fn reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Choice(labels) => {
            let row: Vec<KeyboardButton> = labels.iter().map(KeyboardButton::new).collect();
            ReplyMarkup::Keyboard(
                KeyboardMarkup::new(vec![row])
                    .resize_keyboard()
                    .one_time_keyboard(),
            )
        }
        Keyboard::Remove => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_message(
        &self,
        target: &Endpoint,
        text: &str,
        options: &SendOptions,
    ) -> TransportResult<MessageRef> {
        let mut request = self.bot.send_message(tg_chat(target.chat), text.to_string());
        if let Some(thread) = target.thread {
            request = request.message_thread_id(tg_thread(thread));
        }
        if options.html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = &options.keyboard {
            request = request.reply_markup(reply_markup(keyboard));
        }
        let sent = request.await.map_err(transport_err)?;
        Ok(MessageRef {
            chat: target.chat,
            message_id: sent.id.0,
        })
    }

    async fn send_media(
        &self,
        target: &Endpoint,
        kind: MediaKind,
        file_id: &str,
        caption: Option<&str>,
    ) -> TransportResult<MessageRef> {
        let input = InputFile::file_id(FileId(file_id.to_string()));
        let chat = tg_chat(target.chat);
        let sent = match kind {
            MediaKind::Photo => {
                let mut request = self.bot.send_photo(chat, input);
                if let Some(thread) = target.thread {
                    request = request.message_thread_id(tg_thread(thread));
                }
                if let Some(caption) = caption {
                    request = request.caption(caption.to_string());
                }
                request.await
            }
            MediaKind::Document => {
                let mut request = self.bot.send_document(chat, input);
                if let Some(thread) = target.thread {
                    request = request.message_thread_id(tg_thread(thread));
                }
                if let Some(caption) = caption {
                    request = request.caption(caption.to_string());
                }
                request.await
            }
        }
        .map_err(transport_err)?;
        Ok(MessageRef {
            chat: target.chat,
            message_id: sent.id.0,
        })
    }

    async fn copy_message(
        &self,
        from: ChatId,
        message_id: i32,
        to: &Endpoint,
    ) -> TransportResult<MessageRef> {
        let mut request = self
            .bot
            .copy_message(tg_chat(to.chat), tg_chat(from), MessageId(message_id));
        if let Some(thread) = to.thread {
            request = request.message_thread_id(tg_thread(thread));
        }
        let copied = request.await.map_err(transport_err)?;
        Ok(MessageRef {
            chat: to.chat,
            message_id: copied.0,
        })
    }

    async fn forward_message(
        &self,
        from: ChatId,
        message_id: i32,
        to: &Endpoint,
    ) -> TransportResult<MessageRef> {
        let mut request = self
            .bot
            .forward_message(tg_chat(to.chat), tg_chat(from), MessageId(message_id));
        if let Some(thread) = to.thread {
            request = request.message_thread_id(tg_thread(thread));
        }
        let forwarded = request.await.map_err(transport_err)?;
        Ok(MessageRef {
            chat: to.chat,
            message_id: forwarded.id.0,
        })
    }

    async fn create_sub_thread(&self, group: ChatId, label: &str) -> TransportResult<ThreadId> {
        let topic = self
            .bot
            .create_forum_topic(tg_chat(group), label.to_string())
            .await
            .map_err(transport_err)?;
        let thread = ThreadId(topic.thread_id.0 .0);
        debug!(group = %group, thread_id = %thread, "Forum topic created");
        Ok(thread)
    }
}
