// tests/integration/command_flow_test.rs

//! Command routing driven through the whole pipeline: chat-message frames
//! arrive on a real socket and end in declared handlers, in arrival order.

use super::test_helpers::{
    GatewayServer, connect, event_frame, message_created, test_client, webhook_message_created,
    welcome_frame,
};
use futures::StreamExt;
use parlance::Client;
use parlance::ParlanceError;
use parlance::commands::{CommandTree, FailureReason, Leaf, ParamShape, ParamValue};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

fn command_client(tree: CommandTree) -> Client {
    Client::builder("test-token")
        .prefix("!")
        .commands(tree)
        .build()
        .expect("failed to build test client")
}

#[tokio::test]
async fn test_invocation_reaches_the_handler() {
    let (seen_tx, mut seen) = mpsc::unbounded_channel();
    let tree = CommandTree::builder()
        .command(
            Leaf::declare("ban")
                .required("target", ParamShape::Id)
                .rest("reason")
                .handler_fn(move |context, values| {
                    let _ = seen_tx.send((context.channel_id().to_string(), values));
                    futures::future::ready(Ok(()))
                }),
        )
        .build()
        .unwrap();
    let client = command_client(tree);

    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame(
            "ChatMessageCreated",
            message_created("!ban user42 spamming  links"),
        ),
    ])
    .await;
    let handle = connect(&client, &server).await;

    let (channel, values) = timeout(WAIT, seen.recv()).await.unwrap().unwrap();
    assert_eq!(channel, "11111111-2222-3333-4444-555555555555");
    assert_eq!(
        values,
        vec![
            ParamValue::Id("user42".to_string()),
            // Inner spacing survives the trip through the wire.
            ParamValue::String("spamming  links".to_string()),
        ]
    );

    handle.close().await;
    server.finish().await;
    client.close().await;
}

#[tokio::test]
async fn test_plain_messages_publish_but_do_not_invoke() {
    let (seen_tx, mut seen) = mpsc::unbounded_channel();
    let tree = CommandTree::builder()
        .command(Leaf::declare("ping").handler_fn(move |_context, _values| {
            let _ = seen_tx.send(());
            futures::future::ready(Ok(()))
        }))
        .build()
        .unwrap();
    let client = command_client(tree);
    let mut messages = client.on_message_created();

    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("ChatMessageCreated", message_created("ping")),
        event_frame("ChatMessageCreated", message_created("!ping")),
    ])
    .await;
    let handle = connect(&client, &server).await;

    // Both messages reach subscribers, prefixed or not.
    let first = timeout(WAIT, messages.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(first.message.content(), "ping");
    let second = timeout(WAIT, messages.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(second.message.content(), "!ping");

    // Only the prefixed one invoked the handler.
    timeout(WAIT, seen.recv()).await.unwrap().unwrap();
    assert!(timeout(Duration::from_millis(100), seen.recv()).await.is_err());

    handle.close().await;
    server.finish().await;
    client.close().await;
}

#[tokio::test]
async fn test_webhook_messages_do_not_invoke() {
    let (seen_tx, mut seen) = mpsc::unbounded_channel();
    let tree = CommandTree::builder()
        .command(Leaf::declare("ping").handler_fn(move |_context, _values| {
            let _ = seen_tx.send(());
            futures::future::ready(Ok(()))
        }))
        .build()
        .unwrap();
    let client = command_client(tree);

    // The webhook-authored invocation comes first; in-order processing means
    // a single received ping proves it was skipped.
    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("ChatMessageCreated", webhook_message_created("!ping")),
        event_frame("ChatMessageCreated", message_created("!ping")),
    ])
    .await;
    let handle = connect(&client, &server).await;

    timeout(WAIT, seen.recv()).await.unwrap().unwrap();
    assert!(timeout(Duration::from_millis(100), seen.recv()).await.is_err());

    handle.close().await;
    server.finish().await;
    client.close().await;
}

#[tokio::test]
async fn test_handler_errors_do_not_stop_the_feed() {
    let (seen_tx, mut seen) = mpsc::unbounded_channel();
    let tree = CommandTree::builder()
        .command(Leaf::declare("boom").handler_fn(move |_context, _values| {
            let _ = seen_tx.send(());
            futures::future::ready(Err(ParlanceError::Internal("each time".to_string())))
        }))
        .build()
        .unwrap();
    let client = command_client(tree);

    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("ChatMessageCreated", message_created("!boom")),
        event_frame("ChatMessageCreated", message_created("!boom")),
    ])
    .await;
    let handle = connect(&client, &server).await;

    // The first failure is logged, not fatal; the second frame still runs.
    timeout(WAIT, seen.recv()).await.unwrap().unwrap();
    timeout(WAIT, seen.recv()).await.unwrap().unwrap();

    handle.close().await;
    server.finish().await;
    client.close().await;
}

#[tokio::test]
async fn test_unresolved_invocations_surface_on_the_failure_stream() {
    let tree = CommandTree::builder()
        .command(Leaf::declare("ping").handler_fn(|_context, _values| {
            futures::future::ready(Ok(()))
        }))
        .build()
        .unwrap();
    let client = command_client(tree);
    let mut failures = client.command_failures().unwrap();

    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("ChatMessageCreated", message_created("!frobnicate now")),
    ])
    .await;
    let handle = connect(&client, &server).await;

    let failure = timeout(WAIT, failures.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(failure.reason, FailureReason::NotFound);
    assert_eq!(failure.context.root_name, "frobnicate");
    assert_eq!(failure.context.prefix, "!");

    handle.close().await;
    server.finish().await;
    client.close().await;
}

#[tokio::test]
async fn test_frames_run_to_completion_in_order() {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, mut done) = mpsc::unbounded_channel();
    let handler_log = Arc::clone(&log);
    let tree = CommandTree::builder()
        .command(
            Leaf::declare("seq")
                .required("tag", ParamShape::String)
                .handler_fn(move |_context, values| {
                    let log = Arc::clone(&handler_log);
                    let done = done_tx.clone();
                    async move {
                        let tag = values[0].as_str().unwrap_or_default().to_string();
                        log.lock().push(format!("start-{tag}"));
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        log.lock().push(format!("end-{tag}"));
                        let _ = done.send(());
                        Ok(())
                    }
                }),
        )
        .build()
        .unwrap();
    let client = command_client(tree);

    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("ChatMessageCreated", message_created("!seq one")),
        event_frame("ChatMessageCreated", message_created("!seq two")),
    ])
    .await;
    let handle = connect(&client, &server).await;

    timeout(WAIT, done.recv()).await.unwrap().unwrap();
    timeout(WAIT, done.recv()).await.unwrap().unwrap();

    // The second frame waited for the first handler to finish.
    assert_eq!(
        *log.lock(),
        vec!["start-one", "end-one", "start-two", "end-two"]
    );

    handle.close().await;
    server.finish().await;
    client.close().await;
}

#[tokio::test]
async fn test_client_without_commands_still_streams_messages() {
    let client = test_client("!");
    let mut messages = client.on_message_created();

    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("ChatMessageCreated", message_created("!ping")),
    ])
    .await;
    let handle = connect(&client, &server).await;

    let event = timeout(WAIT, messages.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(event.message.content(), "!ping");

    handle.close().await;
    server.finish().await;
    client.close().await;
}
