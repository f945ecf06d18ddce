// tests/integration/test_helpers.rs

//! Test helpers for end-to-end gateway tests: a scripted local websocket
//! server the client connects to over a real socket, plus frame builders
//! producing the platform's wire JSON.

use futures::{SinkExt, StreamExt};
use parlance::Client;
use parlance::gateway::{GatewayHandle, GatewayOptions, RESUME_HEADER};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Sets up minimal tracing for tests (ignore error if already initialized).
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("warn"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// What the scripted server observed while serving one client session.
#[derive(Debug)]
pub struct ServerReport {
    /// Value of the resume header on the handshake, if the client sent one.
    pub resume_header: Option<String>,
    /// Text frames received from the client, heartbeats included.
    pub received: Vec<String>,
    /// Whether the client ended the session with a websocket close frame.
    pub client_closed: bool,
}

/// A one-session gateway: accepts a single connection, sends the scripted
/// frames, then keeps reading until the client goes away.
pub struct GatewayServer {
    pub url: String,
    task: JoinHandle<ServerReport>,
}

impl GatewayServer {
    pub async fn spawn(frames: Vec<String>) -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let task = tokio::spawn(serve_one_session(listener, frames));
        Self { url, task }
    }

    /// Waits for the session to end and returns what the server saw.
    pub async fn finish(self) -> ServerReport {
        self.task.await.expect("gateway server task panicked")
    }
}

async fn serve_one_session(listener: TcpListener, frames: Vec<String>) -> ServerReport {
    let (stream, _) = listener.accept().await.expect("client never connected");

    let mut resume_header = None;
    let callback = |request: &Request, response: Response| {
        resume_header = request
            .headers()
            .get(RESUME_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(response)
    };
    let mut socket = accept_hdr_async(stream, callback)
        .await
        .expect("websocket handshake failed");

    for frame in frames {
        socket
            .send(Message::Text(frame.into()))
            .await
            .expect("failed to send scripted frame");
    }

    let mut received = Vec::new();
    let mut client_closed = false;
    while let Some(message) = socket.next().await {
        match message {
            Ok(Message::Text(text)) => received.push(text.as_str().to_string()),
            Ok(Message::Close(_)) => {
                client_closed = true;
                break;
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }

    ServerReport {
        resume_header,
        received,
        client_closed,
    }
}

/// A gateway that refuses the handshake with the given HTTP status.
pub struct RejectingGateway {
    pub url: String,
}

impl RejectingGateway {
    pub async fn spawn(status: u16) -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let url = format!("ws://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("client never connected");
            let callback = move |_request: &Request, _response: Response| {
                let rejection: ErrorResponse = tungstenite::http::Response::builder()
                    .status(status)
                    .body(Some("access denied".to_string()))
                    .unwrap();
                Err(rejection)
            };
            // The handshake error ends the session; nothing else to serve.
            let _ = accept_hdr_async(stream, callback).await;
        });
        Self { url }
    }
}

pub fn test_client(prefix: &str) -> Client {
    Client::builder("test-token")
        .prefix(prefix)
        .build()
        .expect("failed to build test client")
}

pub async fn connect(client: &Client, server: &GatewayServer) -> GatewayHandle {
    client
        .connect_with(GatewayOptions {
            url: Some(server.url.clone()),
            ..GatewayOptions::default()
        })
        .await
        .expect("failed to open gateway connection")
}

pub fn welcome_frame(heartbeat_ms: u64) -> String {
    json!({
        "opcode": 1,
        "payload": {"heartbeatIntervalMs": heartbeat_ms, "botId": "bot-1"}
    })
    .to_string()
}

pub fn resume_ack_frame(cursor: &str) -> String {
    json!({
        "opcode": 2,
        "payload": {"lastEventCursor": cursor}
    })
    .to_string()
}

pub fn error_frame(message: &str) -> String {
    json!({
        "opcode": 8,
        "payload": {"message": message}
    })
    .to_string()
}

pub fn event_frame(name: &str, payload: Value) -> String {
    json!({
        "opcode": 0,
        "eventName": name,
        "payload": payload
    })
    .to_string()
}

pub fn event_frame_with_cursor(name: &str, payload: Value, cursor: &str) -> String {
    json!({
        "opcode": 0,
        "eventName": name,
        "payload": payload,
        "lastEventCursor": cursor
    })
    .to_string()
}

/// A `ChatMessageCreated` payload authored by a regular user.
pub fn message_created(content: &str) -> Value {
    json!({
        "serverId": "wlVr3Ggl",
        "message": {
            "id": "00000000-0000-0000-0000-000000000010",
            "type": "default",
            "serverId": "wlVr3Ggl",
            "channelId": "11111111-2222-3333-4444-555555555555",
            "content": content,
            "createdBy": "mGz5kPWd",
            "createdAt": "2025-08-20T12:00:00Z"
        }
    })
}

/// A `ChatMessageCreated` payload authored by a webhook.
pub fn webhook_message_created(content: &str) -> Value {
    let mut payload = message_created(content);
    payload["message"]["createdByWebhookId"] = json!("webhook-77");
    payload
}
