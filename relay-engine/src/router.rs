//! Router: turns one [`InboundEvent`] into registry lookups, relays, state transitions and prompts.
//!
//! **Client message:** `/start` restarts the script in a fresh thread. Anything else is resolved to
//! the client's thread and relayed there *before* the state machine looks at it; then the
//! transition is stored and its actions are sent.
//!
//! **Manager message:** reverse lookup first (unknown thread: no-op), copy verbatim to the client,
//! then a price quote forces `AwaitingDecision` with a yes/no keyboard.
//!
//! The next state is stored before any action is sent; a failed prompt is logged and the
//! transition stays.
//!
//! Events of one client must reach [`Router::handle`] one at a time; the
//! [`Dispatcher`](crate::Dispatcher) guarantees this. Concurrent first messages still share one
//! active thread, but the script would race on the conversation state.

use crate::classify::{self, ClientCommand};
use crate::registry::ThreadRegistry;
use crate::state::{self, Action, ConversationState, ConversationStates, Step};
use crate::texts;
use relay_core::{
    ClientId, ClientMessage, Content, Endpoint, InboundEvent, ManagerMessage, MediaKind,
    MessageRef, RelayError, Result, SendOptions, ThreadId, Transport,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// How client messages reach the thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelayMode {
    /// `copyMessage`: same content, no "forwarded from" header.
    #[default]
    Copy,
    /// `forwardMessage`: keeps the origin header.
    Forward,
    /// Re-send text with a prefix and photos/documents by file id; other media fall back to copy.
    Resend,
}

impl FromStr for RelayMode {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "copy" => Ok(RelayMode::Copy),
            "forward" => Ok(RelayMode::Forward),
            "resend" => Ok(RelayMode::Resend),
            other => Err(RelayError::Config(format!(
                "unknown relay mode '{}', expected copy | forward | resend",
                other
            ))),
        }
    }
}

pub struct Router {
    transport: Arc<dyn Transport>,
    registry: Arc<ThreadRegistry>,
    states: ConversationStates,
    mode: RelayMode,
}

impl Router {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: Arc<ThreadRegistry>,
        states: ConversationStates,
        mode: RelayMode,
    ) -> Self {
        Self {
            transport,
            registry,
            states,
            mode,
        }
    }

    pub fn registry(&self) -> &Arc<ThreadRegistry> {
        &self.registry
    }

    pub fn states(&self) -> &ConversationStates {
        &self.states
    }

    /// Handles one inbound event. Errors are returned for logging; nothing is retried.
    pub async fn handle(&self, event: InboundEvent) -> Result<()> {
        match event {
            InboundEvent::Client(message) => self.handle_client(message).await,
            InboundEvent::Manager(message) => self.handle_manager(message).await,
        }
    }

    #[instrument(skip(self, message), fields(client_id = %message.client, kind = message.content.kind()))]
    async fn handle_client(&self, message: ClientMessage) -> Result<()> {
        if let Some(ClientCommand::Start) = classify::parse_command(message.text.as_deref()) {
            return self.restart(&message).await;
        }

        let client = message.client;
        let resolved = self
            .registry
            .resolve_or_create(client, &message.display)
            .await?;
        if resolved.created {
            self.states
                .set(client, ConversationState::AwaitingEstimate)
                .await?;
        }

        self.relay_to_thread(&message, resolved.thread).await?;

        let current = self.states.get(client).await?;
        let step = state::on_client_message(current, message.text.as_deref(), &message.content);
        self.apply(client, resolved.thread, current, step).await
    }

    #[instrument(skip(self, message), fields(thread_id = %message.thread))]
    async fn handle_manager(&self, message: ManagerMessage) -> Result<()> {
        let Some(client) = self.registry.reverse_lookup(message.thread).await? else {
            debug!(thread_id = %message.thread, "Manager message in unknown thread, ignored");
            return Ok(());
        };

        let target = Endpoint::client(client);
        self.transport
            .copy_message(message.message.chat, message.message.message_id, &target)
            .await
            .map_err(|e| {
                error!(client_id = %client, error = %e, "Failed to copy manager message to client");
                RelayError::TransportSendFailed(e)
            })?;
        debug!(client_id = %client, "Manager message copied to client");

        let is_price = message
            .text
            .as_deref()
            .map(classify::is_price_quote)
            .unwrap_or(false);
        if !is_price {
            return Ok(());
        }

        let prior = self.states.get(client).await?;
        info!(client_id = %client, prior = %prior, "Price quote detected");
        let step = state::on_price_quote(prior);
        self.apply(client, message.thread, prior, step).await
    }

    /// `/start`: new thread (or the first one), greeting, `AwaitingEstimate`. The command itself is not relayed.
    async fn restart(&self, message: &ClientMessage) -> Result<()> {
        let client = message.client;
        let thread = match self.registry.active_thread(client).await? {
            Some(_) => {
                self.registry
                    .force_new_thread(client, &message.display)
                    .await?
            }
            None => {
                self.registry
                    .resolve_or_create(client, &message.display)
                    .await?
                    .thread
            }
        };
        let prior = self.states.get(client).await?;
        info!(client_id = %client, thread_id = %thread, "Session restarted");
        self.apply(client, thread, prior, state::on_restart()).await
    }

    async fn relay_to_thread(&self, message: &ClientMessage, thread: ThreadId) -> Result<MessageRef> {
        let target = Endpoint::thread(self.registry.group(), thread);
        let source = message.message;
        let relayed = match (self.mode, &message.content, message.text.as_deref()) {
            (RelayMode::Copy, _, _) => {
                self.transport
                    .copy_message(source.chat, source.message_id, &target)
                    .await
            }
            (RelayMode::Forward, _, _) => {
                self.transport
                    .forward_message(source.chat, source.message_id, &target)
                    .await
            }
            (RelayMode::Resend, Content::Text, Some(text)) => {
                let body = format!("{} {}", texts::RESEND_PREFIX, text);
                self.transport
                    .send_message(&target, &body, &SendOptions::default())
                    .await
            }
            (RelayMode::Resend, Content::Photo { file_id }, caption) => {
                self.transport
                    .send_media(&target, MediaKind::Photo, file_id, caption)
                    .await
            }
            (RelayMode::Resend, Content::Document { file_id }, caption) => {
                self.transport
                    .send_media(&target, MediaKind::Document, file_id, caption)
                    .await
            }
            (RelayMode::Resend, _, _) => {
                self.transport
                    .copy_message(source.chat, source.message_id, &target)
                    .await
            }
        };
        relayed.map_err(|e| {
            error!(client_id = %message.client, thread_id = %thread, error = %e, "Failed to relay client message");
            RelayError::TransportSendFailed(e)
        })
    }

    /// Stores the next state, then sends the actions. Send failures are logged only.
    async fn apply(
        &self,
        client: ClientId,
        thread: ThreadId,
        prior: ConversationState,
        step: Step,
    ) -> Result<()> {
        if step.next != prior {
            info!(client_id = %client, from = %prior, to = %step.next, "State transition");
        }
        self.states.set(client, step.next).await?;

        for action in step.actions {
            let (target, text, options) = match action {
                Action::ReplyToClient { text, options } => (Endpoint::client(client), text, options),
                Action::NotifyManagers { text } => (
                    Endpoint::thread(self.registry.group(), thread),
                    text,
                    SendOptions::default(),
                ),
            };
            if let Err(e) = self.transport.send_message(&target, &text, &options).await {
                warn!(client_id = %client, chat_id = %target.chat, error = %e, "Failed to send script message");
            }
        }
        Ok(())
    }
}
