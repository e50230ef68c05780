//! Per-client conversation state machine.
//!
//! Transitions are pure: they take the current [`ConversationState`] and the inbound message and
//! return a [`Step`] with the next state and the [`Action`]s the router must perform. Nothing here
//! blocks relaying; the router has already copied the message to the other party.
//!
//! [`ConversationStates`] keeps the current state per client in an injected [`KeyedStore`].

use crate::classify::{self, Decision};
use crate::store::{InMemoryStore, KeyedStore};
use crate::texts;
use relay_core::{ClientId, Content, Keyboard, Result, SendOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Script step of one client. `Idle` is free-chat passthrough and the value for unknown clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversationState {
    AwaitingEstimate,
    AwaitingPrice,
    AwaitingDecision,
    AwaitingContact,
    AwaitingFeedback,
    #[default]
    Idle,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::AwaitingEstimate => "awaiting_estimate",
            ConversationState::AwaitingPrice => "awaiting_price",
            ConversationState::AwaitingDecision => "awaiting_decision",
            ConversationState::AwaitingContact => "awaiting_contact",
            ConversationState::AwaitingFeedback => "awaiting_feedback",
            ConversationState::Idle => "idle",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Message to the client's private chat.
    ReplyToClient { text: String, options: SendOptions },
    /// Message into the client's active thread in the manager group.
    NotifyManagers { text: String },
}

impl Action {
    fn reply(text: &str) -> Self {
        Action::ReplyToClient {
            text: text.to_string(),
            options: SendOptions::default(),
        }
    }

    fn reply_with(text: &str, options: SendOptions) -> Self {
        Action::ReplyToClient {
            text: text.to_string(),
            options,
        }
    }

    fn notify(text: &str) -> Self {
        Action::NotifyManagers {
            text: text.to_string(),
        }
    }
}

/// Result of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: ConversationState,
    pub actions: Vec<Action>,
}

impl Step {
    fn stay(state: ConversationState) -> Self {
        Self {
            next: state,
            actions: Vec::new(),
        }
    }

    fn to(next: ConversationState, actions: Vec<Action>) -> Self {
        Self { next, actions }
    }
}

/// Client-side transition for a message that has already been relayed to the thread.
pub fn on_client_message(
    state: ConversationState,
    text: Option<&str>,
    content: &Content,
) -> Step {
    use ConversationState::*;

    match state {
        AwaitingEstimate => match classify::classify_estimate(text, content) {
            Some(_) => Step::to(
                AwaitingPrice,
                vec![
                    Action::reply(texts::ESTIMATE_RECEIVED),
                    Action::notify(texts::MANAGER_PRICE_REQUEST),
                ],
            ),
            None => Step::to(AwaitingEstimate, vec![Action::reply(texts::ESTIMATE_HINT)]),
        },
        AwaitingPrice => Step::stay(AwaitingPrice),
        AwaitingDecision => match classify::classify_decision(text) {
            Some(Decision::Accept) => Step::to(
                AwaitingContact,
                vec![
                    Action::reply_with(
                        texts::CONTACT_REQUEST,
                        SendOptions::with_keyboard(Keyboard::Remove),
                    ),
                    Action::notify(texts::MANAGER_CLIENT_AGREED),
                ],
            ),
            Some(Decision::Decline) => Step::to(
                AwaitingFeedback,
                vec![
                    Action::reply_with(
                        texts::FEEDBACK_REQUEST,
                        SendOptions::with_keyboard(Keyboard::Remove),
                    ),
                    Action::notify(texts::MANAGER_CLIENT_DECLINED),
                ],
            ),
            None => Step::to(AwaitingDecision, vec![Action::reply(texts::DECISION_HINT)]),
        },
        AwaitingContact => Step::to(Idle, vec![Action::reply(texts::CONTACT_RECEIVED)]),
        AwaitingFeedback => Step::to(Idle, vec![Action::reply(texts::FEEDBACK_THANKS)]),
        Idle => Step::stay(Idle),
    }
}

/// Manager posted a price. Always moves to `AwaitingDecision`, whatever `prior` is.
///
/// This override may cut into a running script (e.g. while contacts are expected); the
/// preemption is logged so operators can see it.
pub fn on_price_quote(prior: ConversationState) -> Step {
    if matches!(
        prior,
        ConversationState::AwaitingContact | ConversationState::AwaitingFeedback
    ) {
        warn!(preempted = %prior, "price quote preempts running script step");
    }
    let keyboard = Keyboard::Choice(vec![
        texts::BUTTON_YES.to_string(),
        texts::BUTTON_NO.to_string(),
    ]);
    Step::to(
        ConversationState::AwaitingDecision,
        vec![Action::reply_with(
            texts::DECISION_PROMPT,
            SendOptions::with_keyboard(keyboard),
        )],
    )
}

/// `/start`: greet and wait for an estimate.
pub fn on_restart() -> Step {
    Step::to(
        ConversationState::AwaitingEstimate,
        vec![Action::reply_with(texts::GREETING, SendOptions::html())],
    )
}

/// Current state per client. Clients without a record are `Idle`.
#[derive(Clone)]
pub struct ConversationStates {
    store: Arc<dyn KeyedStore<ClientId, ConversationState>>,
}

impl ConversationStates {
    pub fn new(store: Arc<dyn KeyedStore<ClientId, ConversationState>>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    pub async fn get(&self, client: ClientId) -> Result<ConversationState> {
        Ok(self.store.get(&client).await?.unwrap_or_default())
    }

    pub async fn set(&self, client: ClientId, state: ConversationState) -> Result<()> {
        self.store.set(client, state).await
    }
}
