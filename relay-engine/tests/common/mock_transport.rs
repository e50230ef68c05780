//! Mock implementation of [`relay_core::Transport`] for integration tests.
//!
//! Records every call so tests can assert on what was relayed, prompted and created without
//! hitting Telegram. Thread ids start at 100 and message ids at 1000; each primitive can be made
//! to fail.

#![allow(dead_code)] // each test binary uses a different subset

use async_trait::async_trait;
use relay_core::{
    ChatId, ClientDisplay, ClientId, ClientMessage, Content, Endpoint, InboundEvent,
    ManagerMessage, MediaKind, MessageRef, SendOptions, ThreadId, Transport, TransportError,
    TransportResult,
};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

pub const GROUP: ChatId = ChatId(-100_123);

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send {
        target: Endpoint,
        text: String,
        options: SendOptions,
    },
    Media {
        target: Endpoint,
        kind: MediaKind,
        file_id: String,
        caption: Option<String>,
    },
    Copy {
        from: ChatId,
        message_id: i32,
        to: Endpoint,
    },
    Forward {
        from: ChatId,
        message_id: i32,
        to: Endpoint,
    },
    CreateThread {
        group: ChatId,
        label: String,
    },
}

pub struct MockTransport {
    calls: Mutex<Vec<Call>>,
    next_thread: AtomicI32,
    next_message: AtomicI32,
    pub fail_create_thread: AtomicBool,
    pub fail_send: AtomicBool,
    pub fail_copy: AtomicBool,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_thread: AtomicI32::new(100),
            next_message: AtomicI32::new(1000),
            fail_create_thread: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            fail_copy: AtomicBool::new(false),
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn created_threads(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateThread { .. }))
            .count()
    }

    /// Texts sent with `send_message` to the given endpoint, in order.
    pub fn texts_to(&self, target: Endpoint) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { target: t, text, .. } if t == target => Some(text),
                _ => None,
            })
            .collect()
    }

    /// `send_message` calls (text + options) to the given endpoint.
    pub fn sends_to(&self, target: Endpoint) -> Vec<(String, SendOptions)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send {
                    target: t,
                    text,
                    options,
                } if t == target => Some((text, options)),
                _ => None,
            })
            .collect()
    }

    /// Copies of (source chat, message id) to the given endpoint.
    pub fn copies_to(&self, target: Endpoint) -> Vec<(ChatId, i32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Copy {
                    from,
                    message_id,
                    to,
                } if to == target => Some((from, message_id)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn message_ref(&self, chat: ChatId) -> MessageRef {
        MessageRef {
            chat,
            message_id: self.next_message.fetch_add(1, Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(
        &self,
        target: &Endpoint,
        text: &str,
        options: &SendOptions,
    ) -> TransportResult<MessageRef> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(TransportError::new("send failed"));
        }
        self.record(Call::Send {
            target: *target,
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(self.message_ref(target.chat))
    }

    async fn send_media(
        &self,
        target: &Endpoint,
        kind: MediaKind,
        file_id: &str,
        caption: Option<&str>,
    ) -> TransportResult<MessageRef> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(TransportError::new("send media failed"));
        }
        self.record(Call::Media {
            target: *target,
            kind,
            file_id: file_id.to_string(),
            caption: caption.map(str::to_string),
        });
        Ok(self.message_ref(target.chat))
    }

    async fn copy_message(
        &self,
        from: ChatId,
        message_id: i32,
        to: &Endpoint,
    ) -> TransportResult<MessageRef> {
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(TransportError::new("copy failed"));
        }
        self.record(Call::Copy {
            from,
            message_id,
            to: *to,
        });
        Ok(self.message_ref(to.chat))
    }

    async fn forward_message(
        &self,
        from: ChatId,
        message_id: i32,
        to: &Endpoint,
    ) -> TransportResult<MessageRef> {
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(TransportError::new("forward failed"));
        }
        self.record(Call::Forward {
            from,
            message_id,
            to: *to,
        });
        Ok(self.message_ref(to.chat))
    }

    async fn create_sub_thread(&self, group: ChatId, label: &str) -> TransportResult<ThreadId> {
        // Suspend once, like a network round-trip, so concurrent callers interleave.
        tokio::task::yield_now().await;
        if self.fail_create_thread.load(Ordering::SeqCst) {
            return Err(TransportError::new("Bad Request: not enough rights to create a topic"));
        }
        self.record(Call::CreateThread {
            group,
            label: label.to_string(),
        });
        Ok(ThreadId(self.next_thread.fetch_add(1, Ordering::SeqCst)))
    }
}

// ---------- event builders ----------

pub fn display(username: &str) -> ClientDisplay {
    ClientDisplay {
        username: Some(username.to_string()),
        full_name: format!("{} Test", username),
    }
}

pub fn client_event(client: i64, message_id: i32, content: Content, text: Option<&str>) -> InboundEvent {
    InboundEvent::Client(ClientMessage {
        client: ClientId(client),
        display: display(&format!("user{}", client)),
        message: MessageRef {
            chat: ChatId(client),
            message_id,
        },
        content,
        text: text.map(str::to_string),
    })
}

pub fn client_text(client: i64, message_id: i32, text: &str) -> InboundEvent {
    client_event(client, message_id, Content::Text, Some(text))
}

pub fn manager_text(thread: ThreadId, message_id: i32, text: &str) -> InboundEvent {
    InboundEvent::Manager(ManagerMessage {
        thread,
        message: MessageRef {
            chat: GROUP,
            message_id,
        },
        content: Content::Text,
        text: Some(text.to_string()),
    })
}

pub fn thread_endpoint(thread: ThreadId) -> Endpoint {
    Endpoint::thread(GROUP, thread)
}
