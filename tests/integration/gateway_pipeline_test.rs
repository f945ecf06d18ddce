// tests/integration/gateway_pipeline_test.rs

//! End-to-end gateway tests over a real local websocket: frames travel
//! socket -> actor -> processor -> dispatch table -> typed streams.

use super::test_helpers::{
    GatewayServer, RejectingGateway, connect, error_frame, event_frame, event_frame_with_cursor,
    message_created, test_client, welcome_frame,
};
use futures::StreamExt;
use parlance::ParlanceError;
use parlance::client::ClientBuilder;
use parlance::config::ClientConfig;
use parlance::dispatch::EventKey;
use parlance::gateway::GatewayOptions;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

// ===== WELCOME handling =====

#[tokio::test]
async fn test_welcome_retimes_heartbeat_and_reaches_subscribers() {
    let server = GatewayServer::spawn(vec![welcome_frame(50)]).await;
    let client = test_client("!");
    let mut welcomes = client.welcome();
    let mut messages = client.on_message_created();

    let handle = connect(&client, &server).await;

    let welcome = timeout(WAIT, welcomes.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(welcome.heartbeat_interval_ms, 50);
    assert_eq!(welcome.bot_id.as_deref(), Some("bot-1"));

    // The handle mirror follows the announced cadence.
    let deadline = tokio::time::Instant::now() + WAIT;
    while handle.heartbeat_interval() != Duration::from_millis(50) {
        assert!(tokio::time::Instant::now() < deadline, "heartbeat never retimed");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Let a few heartbeats fire on the new cadence.
    tokio::time::sleep(Duration::from_millis(400)).await;

    // WELCOME is a protocol frame; no domain stream may see it.
    assert!(timeout(Duration::from_millis(100), messages.next()).await.is_err());

    handle.close().await;
    let report = server.finish().await;
    assert!(report.client_closed);
    assert!(
        report.received.len() >= 2,
        "expected heartbeats, got {:?}",
        report.received
    );
    assert!(report.received.iter().all(|frame| frame == "2"));
    client.close().await;
}

// ===== Domain event delivery =====

#[tokio::test]
async fn test_domain_event_reaches_typed_stream() {
    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("ChatMessageCreated", message_created("hello there")),
    ])
    .await;
    let client = test_client("!");
    let mut messages = client.on_message_created();

    let handle = connect(&client, &server).await;

    let event = timeout(WAIT, messages.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(event.message.content(), "hello there");
    assert_eq!(event.server_id.as_deref(), Some("wlVr3Ggl"));
    assert_eq!(event.message.created_by, "mGz5kPWd");

    handle.close().await;
    server.finish().await;
    client.close().await;
}

#[tokio::test]
async fn test_unregistered_events_are_dropped() {
    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("SomethingNobodyKnows", json!({"x": 1})),
        event_frame("ChatMessageCreated", message_created("after the stranger")),
    ])
    .await;
    let client = test_client("!");
    let mut messages = client.on_message_created();
    let mut errors = client.dispatch_errors();

    let handle = connect(&client, &server).await;

    // The unknown frame vanishes without an error; the next one flows.
    let event = timeout(WAIT, messages.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(event.message.content(), "after the stranger");
    assert!(timeout(Duration::from_millis(100), errors.next()).await.is_err());

    handle.close().await;
    server.finish().await;
    client.close().await;
}

#[tokio::test]
async fn test_decode_failure_is_reported_and_isolated() {
    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame("ChatMessageCreated", json!({"message": 5})),
        event_frame("ChatMessageCreated", message_created("still alive")),
    ])
    .await;
    let client = test_client("!");
    let mut messages = client.on_message_created();
    let mut errors = client.dispatch_errors();

    let handle = connect(&client, &server).await;

    let report = timeout(WAIT, errors.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(report.key, Some(EventKey::name("ChatMessageCreated")));
    assert!(matches!(report.error, ParlanceError::EventDecode { .. }));

    // The bad frame cost nothing but itself.
    let event = timeout(WAIT, messages.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(event.message.content(), "still alive");

    handle.close().await;
    server.finish().await;
    client.close().await;
}

// ===== Cursor tracking and resume =====

#[tokio::test]
async fn test_cursor_is_tracked_and_replayed_on_resume() {
    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        event_frame_with_cursor("ChatMessageCreated", message_created("first"), "cursor-1"),
    ])
    .await;
    let client = test_client("!");
    let mut messages = client.on_message_created();

    let handle = connect(&client, &server).await;
    timeout(WAIT, messages.next()).await.unwrap().unwrap().unwrap();

    // The cursor was recorded before the frame was forwarded.
    assert_eq!(handle.last_event_cursor().as_deref(), Some("cursor-1"));

    handle.close().await;
    let report = server.finish().await;
    assert_eq!(report.resume_header, None);

    // A fresh open carrying the cursor presents it during the handshake.
    let resumed_server = GatewayServer::spawn(vec![welcome_frame(30_000)]).await;
    let resumed = client
        .connect_with(GatewayOptions {
            url: Some(resumed_server.url.clone()),
            last_event_cursor: Some("cursor-1".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(resumed.last_event_cursor().as_deref(), Some("cursor-1"));

    resumed.close().await;
    let report = resumed_server.finish().await;
    assert_eq!(report.resume_header.as_deref(), Some("cursor-1"));
    client.close().await;
}

// ===== Disconnects =====

#[tokio::test]
async fn test_error_frame_is_terminal_with_protocol_error() {
    let server = GatewayServer::spawn(vec![
        welcome_frame(30_000),
        error_frame("session rejected"),
    ])
    .await;
    let client = test_client("!");
    let mut disconnects = client.disconnects();

    let _handle = connect(&client, &server).await;

    let event = timeout(WAIT, disconnects.next()).await.unwrap().unwrap().unwrap();
    assert!(event.protocol_error);
    assert_eq!(event.message.as_deref(), Some("session rejected"));

    let report = server.finish().await;
    assert!(!report.client_closed);
    client.close().await;
}

#[tokio::test]
async fn test_clean_close_reports_plain_disconnect() {
    let server = GatewayServer::spawn(vec![welcome_frame(30_000)]).await;
    let client = test_client("!");
    let mut disconnects = client.disconnects();

    let handle = connect(&client, &server).await;
    handle.close().await;

    let event = timeout(WAIT, disconnects.next()).await.unwrap().unwrap().unwrap();
    assert!(!event.protocol_error);
    assert_eq!(event.message, None);

    let report = server.finish().await;
    assert!(report.client_closed);
    client.close().await;
}

// ===== Handshake failures =====

#[tokio::test]
async fn test_http_rejection_fails_without_retry() {
    let gateway = RejectingGateway::spawn(401).await;
    let client = test_client("!");

    let started = tokio::time::Instant::now();
    let err = client
        .connect_with(GatewayOptions {
            url: Some(gateway.url.clone()),
            ..GatewayOptions::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ParlanceError::HandshakeFailed(_)));
    assert!(format!("{err}").contains("401"));
    // A refusal must not burn the retry budget.
    assert!(started.elapsed() < Duration::from_secs(1));
    client.close().await;
}

#[tokio::test]
async fn test_unreachable_gateway_exhausts_the_attempt_budget() {
    let mut config = ClientConfig::new("test-token");
    config.reconnect.open_attempts = 2;
    config.reconnect.initial_delay = Duration::from_millis(10);
    config.reconnect.max_delay = Duration::from_millis(50);
    let client = ClientBuilder::from_config(config).build().unwrap();

    let err = client
        .connect_with(GatewayOptions {
            // Port 1 refuses connections outright.
            url: Some("ws://127.0.0.1:1".to_string()),
            ..GatewayOptions::default()
        })
        .await
        .unwrap_err();

    assert!(format!("{err}").contains("giving up after 2 attempts"));
    client.close().await;
}
