//! Integration tests for [`relay_engine::Dispatcher`]: per-client ordering and concurrency.

use std::sync::Arc;

use relay_core::{ChatId, ClientId, Endpoint};
use relay_engine::{build_router, ConversationState, Dispatcher, RelayMode};

mod common;
use common::mock_transport::{client_text, manager_text, thread_endpoint, MockTransport, GROUP};

fn setup() -> (Arc<MockTransport>, Dispatcher) {
    let transport = Arc::new(MockTransport::new());
    let router = Arc::new(build_router(transport.clone(), GROUP, RelayMode::Copy));
    (transport, Dispatcher::new(router))
}

/// **Test: Two rapid messages from a new client share one thread and arrive in order.**
#[tokio::test]
async fn test_rapid_double_message_creates_one_thread() {
    let (transport, dispatcher) = setup();

    dispatcher.dispatch(client_text(42, 1, "привет")).await;
    dispatcher.dispatch(client_text(42, 2, "вот смета")).await;
    dispatcher.close().await;

    assert_eq!(transport.created_threads(), 1);
    let router = dispatcher.router();
    let thread = router
        .registry()
        .active_thread(ClientId(42))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        transport.copies_to(thread_endpoint(thread)),
        vec![(ChatId(42), 1), (ChatId(42), 2)]
    );
    assert_eq!(
        router.states().get(ClientId(42)).await.unwrap(),
        ConversationState::AwaitingPrice
    );
}

/// **Test: Many clients in parallel each get their own thread with all messages in order.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_clients_keep_per_client_order() {
    let (transport, dispatcher) = setup();

    for id in 1..=5 {
        for client in 1..=20 {
            dispatcher
                .dispatch(client_text(client, id, &format!("msg {}", id)))
                .await;
        }
    }
    dispatcher.close().await;

    assert_eq!(transport.created_threads(), 20);
    let router = dispatcher.router();
    for client in 1..=20 {
        let thread = router
            .registry()
            .active_thread(ClientId(client))
            .await
            .unwrap()
            .unwrap();
        let ids: Vec<i32> = transport
            .copies_to(thread_endpoint(thread))
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5], "client {}", client);
    }
}

/// **Test: Manager replies are queued behind the client's pending events.**
#[tokio::test]
async fn test_manager_reply_sequenced_with_client() {
    let (transport, dispatcher) = setup();

    dispatcher.dispatch(client_text(42, 1, "https://petrovich.ru/cabinet/estimate/1/")).await;
    dispatcher.close().await;
    let router = dispatcher.router();
    let thread = router
        .registry()
        .active_thread(ClientId(42))
        .await
        .unwrap()
        .unwrap();

    dispatcher.dispatch(manager_text(thread, 50, "3000 ₽")).await;
    dispatcher.dispatch(client_text(42, 2, "да")).await;
    dispatcher.close().await;

    assert_eq!(
        transport.copies_to(Endpoint::client(ClientId(42))),
        vec![(GROUP, 50)]
    );
    assert_eq!(
        router.states().get(ClientId(42)).await.unwrap(),
        ConversationState::AwaitingContact
    );
}

/// **Test: Manager message in an unknown thread is dropped before queueing.**
#[tokio::test]
async fn test_unknown_thread_dropped() {
    let (transport, dispatcher) = setup();
    dispatcher
        .dispatch(manager_text(relay_core::ThreadId(404), 1, "1000 руб"))
        .await;
    dispatcher.close().await;
    assert!(transport.calls().is_empty());
}

/// **Test: An idle client's queue loop stops; the next event starts a new one and order holds.**
#[tokio::test]
async fn test_idle_queue_is_released() {
    let (transport, dispatcher) = setup();

    dispatcher.dispatch(client_text(42, 1, "привет")).await;
    for _ in 0..100 {
        if dispatcher.active_queues() == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(dispatcher.active_queues(), 0);

    dispatcher.dispatch(client_text(42, 2, "вот смета")).await;
    dispatcher.dispatch(client_text(42, 3, "жду")).await;
    dispatcher.close().await;

    assert_eq!(transport.created_threads(), 1);
    let router = dispatcher.router();
    let thread = router
        .registry()
        .active_thread(ClientId(42))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        transport.copies_to(thread_endpoint(thread)),
        vec![(ChatId(42), 1), (ChatId(42), 2), (ChatId(42), 3)]
    );
    assert_eq!(dispatcher.active_queues(), 0);
}
