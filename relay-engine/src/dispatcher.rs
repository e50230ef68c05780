//! Per-client sequencing in front of the [`Router`].
//!
//! Every client gets its own unbounded queue and a spawned loop that hands events to the router one
//! at a time, so a client's double message and a manager's price reply for the same client never
//! interleave. Different clients run concurrently.
//!
//! A loop ends as soon as its queue is empty and removes its entry; the next event for that client
//! starts a fresh one. Enqueueing and removal both happen under the map entry lock, so an event is
//! never sent to a loop that is shutting down.
//!
//! Manager events are queued under the client that owns the thread; events for unknown threads
//! are dropped here.

use crate::router::Router;
use dashmap::DashMap;
use relay_core::{ClientId, InboundEvent, RelayError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

struct ClientQueue {
    /// Distinguishes a client's successive queues so a draining loop only removes its own entry.
    generation: u64,
    tx: mpsc::UnboundedSender<InboundEvent>,
    handle: JoinHandle<()>,
}

pub struct Dispatcher {
    router: Arc<Router>,
    queues: Arc<DashMap<ClientId, ClientQueue>>,
    next_generation: AtomicU64,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            queues: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Enqueues the event on its client's queue and returns without waiting for processing.
    #[instrument(skip(self, event))]
    pub async fn dispatch(&self, event: InboundEvent) {
        let client = match &event {
            InboundEvent::Client(message) => message.client,
            InboundEvent::Manager(message) => {
                match self.router.registry().owner_of(message.thread).await {
                    Ok(client) => client,
                    Err(RelayError::UnroutableThread(thread)) => {
                        debug!(thread_id = %thread, "Dropping manager message for unknown thread");
                        return;
                    }
                    Err(e) => {
                        error!(thread_id = %message.thread, error = %e, "Reverse lookup failed");
                        return;
                    }
                }
            }
        };

        let queue = self
            .queues
            .entry(client)
            .or_insert_with(|| self.spawn_queue(client));
        if queue.tx.send(event).is_err() {
            error!(client_id = %client, "Client queue closed, event dropped");
        }
    }

    /// Number of clients with a running queue loop.
    pub fn active_queues(&self) -> usize {
        self.queues.len()
    }

    /// Stops accepting events and waits until every queued event has been handled.
    pub async fn close(&self) {
        let clients: Vec<ClientId> = self.queues.iter().map(|entry| *entry.key()).collect();
        let mut handles = Vec::with_capacity(clients.len());
        for client in clients {
            // Dropping the sender ends the loop once the queue is drained.
            if let Some((_, queue)) = self.queues.remove(&client) {
                handles.push(queue.handle);
            }
        }
        info!(queues = handles.len(), "Draining client queues");
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Client queue task failed");
            }
        }
    }

    fn spawn_queue(&self, client: ClientId) -> ClientQueue {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::process_queue_loop(
            rx,
            self.router.clone(),
            self.queues.clone(),
            client,
            generation,
        ));
        ClientQueue {
            generation,
            tx,
            handle,
        }
    }

    async fn process_queue_loop(
        mut rx: mpsc::UnboundedReceiver<InboundEvent>,
        router: Arc<Router>,
        queues: Arc<DashMap<ClientId, ClientQueue>>,
        client: ClientId,
        generation: u64,
    ) {
        while let Some(event) = rx.recv().await {
            if let Err(e) = router.handle(event).await {
                error!(client_id = %client, error = %e, "Failed to handle event");
            }
            let idle = queues.remove_if(&client, |_, queue| {
                queue.generation == generation && rx.is_empty()
            });
            if idle.is_some() {
                debug!(client_id = %client, "Client queue idle, loop stopped");
                return;
            }
        }
        debug!(client_id = %client, "Client queue closed");
    }
}
