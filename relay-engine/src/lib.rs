//! # relay-engine
//!
//! Conversation routing for the manager relay: [`ThreadRegistry`] maps clients to threads of the
//! manager group, the [`state`] machine drives the estimate → price → decision script, the
//! [`Router`] relays each event and applies transitions, and the [`Dispatcher`] keeps events of one
//! client in order. State lives in injected [`KeyedStore`]s.

pub mod classify;
pub mod dispatcher;
pub mod registry;
pub mod router;
pub mod state;
pub mod store;
pub mod texts;

pub use dispatcher::Dispatcher;
pub use registry::{Resolved, ThreadRegistry};
pub use router::{RelayMode, Router};
pub use state::{Action, ConversationState, ConversationStates, Step};
pub use store::{InMemoryStore, KeyedStore};

use relay_core::{ChatId, Transport};
use std::sync::Arc;

/// Builds an in-memory router for the given transport and manager group.
pub fn build_router(transport: Arc<dyn Transport>, group: ChatId, mode: RelayMode) -> Router {
    let registry = Arc::new(ThreadRegistry::in_memory(transport.clone(), group));
    Router::new(transport, registry, ConversationStates::in_memory(), mode)
}
