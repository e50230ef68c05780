//! Thread registry: which thread of the manager group belongs to which client.
//!
//! Two key spaces:
//! - `client -> thread`: the client's active thread (one per client);
//! - `thread -> client`: every thread ever opened for a client, so managers replying in an old
//!   thread still reach the client.
//!
//! The reverse entry is written before the active entry, so every active thread is always
//! reverse-resolvable. On first contact the active entry is claimed with `upsert_if_absent`, so
//! concurrent first messages agree on one active thread. Entries are never removed.

use crate::store::{InMemoryStore, KeyedStore};
use crate::texts;
use relay_core::{
    ChatId, ClientDisplay, ClientId, Endpoint, RelayError, Result, SendOptions, ThreadId,
    Transport,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Thread returned by [`ThreadRegistry::resolve_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub thread: ThreadId,
    /// True when the thread was opened by this call (first contact).
    pub created: bool,
}

pub struct ThreadRegistry {
    transport: Arc<dyn Transport>,
    group: ChatId,
    active: Arc<dyn KeyedStore<ClientId, ThreadId>>,
    owners: Arc<dyn KeyedStore<ThreadId, ClientId>>,
}

impl ThreadRegistry {
    pub fn new(
        transport: Arc<dyn Transport>,
        group: ChatId,
        active: Arc<dyn KeyedStore<ClientId, ThreadId>>,
        owners: Arc<dyn KeyedStore<ThreadId, ClientId>>,
    ) -> Self {
        Self {
            transport,
            group,
            active,
            owners,
        }
    }

    /// Registry backed by in-memory stores (process lifetime).
    pub fn in_memory(transport: Arc<dyn Transport>, group: ChatId) -> Self {
        Self::new(
            transport,
            group,
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
        )
    }

    /// The manager group all threads live in.
    pub fn group(&self) -> ChatId {
        self.group
    }

    /// Active thread of the client, without creating one.
    pub async fn active_thread(&self, client: ClientId) -> Result<Option<ThreadId>> {
        self.active.get(&client).await
    }

    /// Returns the active thread, opening a new one on first contact.
    #[instrument(skip(self, display), fields(client_id = %client))]
    pub async fn resolve_or_create(
        &self,
        client: ClientId,
        display: &ClientDisplay,
    ) -> Result<Resolved> {
        if let Some(thread) = self.active.get(&client).await? {
            return Ok(Resolved {
                thread,
                created: false,
            });
        }
        let opened = self.open_thread(client, display).await?;
        let thread = self.active.upsert_if_absent(client, opened).await?;
        if thread != opened {
            // Lost a first-contact race; the extra thread stays reverse-resolvable but unused.
            warn!(client_id = %client, thread_id = %thread, unused_thread_id = %opened, "Concurrent first contact, keeping existing thread");
            return Ok(Resolved {
                thread,
                created: false,
            });
        }
        self.announce(client, display, thread).await;
        Ok(Resolved {
            thread,
            created: true,
        })
    }

    /// Opens a new thread and makes it active. The previous thread stays routable.
    #[instrument(skip(self, display), fields(client_id = %client))]
    pub async fn force_new_thread(
        &self,
        client: ClientId,
        display: &ClientDisplay,
    ) -> Result<ThreadId> {
        let previous = self.active.get(&client).await?;
        let thread = self.open_thread(client, display).await?;
        self.active.set(client, thread).await?;
        self.announce(client, display, thread).await;
        info!(
            client_id = %client,
            thread_id = %thread,
            previous_thread_id = ?previous.map(|t| t.0),
            "Replaced active thread"
        );
        Ok(thread)
    }

    /// Client owning the thread; `None` when the thread was never registered.
    pub async fn reverse_lookup(&self, thread: ThreadId) -> Result<Option<ClientId>> {
        self.owners.get(&thread).await
    }

    /// Like [`reverse_lookup`](Self::reverse_lookup) but unknown threads are an
    /// [`RelayError::UnroutableThread`].
    pub async fn owner_of(&self, thread: ThreadId) -> Result<ClientId> {
        self.reverse_lookup(thread)
            .await?
            .ok_or(RelayError::UnroutableThread(thread))
    }

    /// Creates the thread and records its owner. The caller decides whether it becomes active.
    async fn open_thread(&self, client: ClientId, display: &ClientDisplay) -> Result<ThreadId> {
        let label = texts::thread_label(client, display);
        let thread = self
            .transport
            .create_sub_thread(self.group, &label)
            .await
            .map_err(|source| {
                error!(client_id = %client, error = %source, "Failed to create thread");
                RelayError::ThreadCreationFailed { client, source }
            })?;

        self.owners.set(thread, client).await?;
        info!(client_id = %client, thread_id = %thread, label = %label, "Thread created");
        Ok(thread)
    }

    /// Posts the new-client notice into the thread; failure is logged only.
    async fn announce(&self, client: ClientId, display: &ClientDisplay, thread: ThreadId) {
        let notice = texts::new_client_notice(client, display);
        let target = Endpoint::thread(self.group, thread);
        if let Err(e) = self
            .transport
            .send_message(&target, &notice, &SendOptions::default())
            .await
        {
            warn!(client_id = %client, thread_id = %thread, error = %e, "Failed to announce client in new thread");
        }
    }
}
