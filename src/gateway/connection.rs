// src/gateway/connection.rs

//! The socket actor: handshake, heartbeat, cursor tracking, and reconnect.
//!
//! Each open socket is owned by one spawned actor. Transport drops are
//! recovered with exponential backoff and a resume re-handshake carrying the
//! latest replay cursor; an ERROR frame from the gateway is terminal and
//! surfaces as a protocol-error disconnect.

use super::envelope::{Envelope, ErrorFrame, Welcome, opcode};
use crate::config::{ClientConfig, ReconnectConfig};
use crate::errors::ParlanceError;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::{AUTHORIZATION, HeaderName};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Header carrying the replay cursor on re-handshake.
pub const RESUME_HEADER: &str = "parlance-last-event-id";

/// Literal ping payload the gateway expects.
const HEARTBEAT_PAYLOAD: &str = "2";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Items flowing from a socket actor to the client's processor.
#[derive(Debug, Clone)]
pub enum GatewayItem {
    Frame(Envelope),
    /// A frame that never decoded far enough to be dispatched.
    Malformed(ParlanceError),
    Disconnected(DisconnectEvent),
}

/// Emitted once when a socket stops delivering frames for good.
#[derive(Debug, Clone, PartialEq)]
pub struct DisconnectEvent {
    pub message: Option<String>,
    /// True when the gateway rejected the session with an ERROR frame or a
    /// refused resume; a fresh open is required.
    pub protocol_error: bool,
}

/// Optional knobs for opening a socket: an alternate URL and a replay cursor
/// to resume from.
#[derive(Debug, Clone, Default)]
pub struct GatewayOptions {
    pub url: Option<String>,
    pub last_event_cursor: Option<String>,
}

/// Control handle for one live socket.
#[derive(Debug)]
pub struct GatewayHandle {
    id: Uuid,
    url: String,
    heartbeat: Arc<Mutex<Duration>>,
    cursor: Arc<Mutex<Option<String>>>,
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl GatewayHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The heartbeat cadence currently in force (retimed by WELCOME frames).
    pub fn heartbeat_interval(&self) -> Duration {
        *self.heartbeat.lock()
    }

    /// The latest replay cursor observed on this socket.
    pub fn last_event_cursor(&self) -> Option<String> {
        self.cursor.lock().clone()
    }

    /// Closes the socket cleanly and waits for the actor to finish.
    pub async fn close(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

pub struct GatewayConnection;

impl GatewayConnection {
    /// Opens a socket, retrying transient failures within the configured
    /// budget, and spawns the actor that owns it. An HTTP-level rejection
    /// (bad credentials, refused cursor) fails immediately.
    pub async fn open(
        config: &ClientConfig,
        options: GatewayOptions,
        feed: mpsc::Sender<GatewayItem>,
    ) -> Result<GatewayHandle, ParlanceError> {
        let url = options.url.unwrap_or_else(|| config.gateway_url.clone());
        let cursor = Arc::new(Mutex::new(options.last_event_cursor));
        let heartbeat = Arc::new(Mutex::new(config.heartbeat_interval));

        let mut attempt = 0u32;
        let mut delay = config.reconnect.initial_delay;
        let stream = loop {
            attempt += 1;
            let resume = cursor.lock().clone();
            match handshake(&url, &config.token, resume.as_deref()).await {
                Ok(stream) => break stream,
                Err(error @ ParlanceError::HandshakeFailed(_)) => return Err(error),
                Err(error) if attempt >= config.reconnect.open_attempts => {
                    return Err(ParlanceError::HandshakeFailed(format!(
                        "giving up after {attempt} attempts: {error}"
                    )));
                }
                Err(error) => {
                    warn!(%error, attempt, "gateway handshake failed; retrying");
                    tokio::time::sleep(jittered(delay)).await;
                    delay = (delay * 2).min(config.reconnect.max_delay);
                }
            }
        };

        let (shutdown, shutdown_rx) = broadcast::channel(1);
        let actor = SocketActor {
            id: Uuid::new_v4(),
            url: url.clone(),
            token: config.token.clone(),
            reconnect: config.reconnect.clone(),
            heartbeat: Arc::clone(&heartbeat),
            cursor: Arc::clone(&cursor),
            feed,
            shutdown: shutdown_rx,
        };
        let id = actor.id;
        info!(socket = %id, %url, "gateway connected");
        let task = tokio::spawn(actor.run(stream));

        Ok(GatewayHandle {
            id,
            url,
            heartbeat,
            cursor,
            shutdown,
            task,
        })
    }
}

/// Performs the websocket upgrade with auth and resume headers attached.
async fn handshake(
    url: &str,
    token: &str,
    cursor: Option<&str>,
) -> Result<WsStream, ParlanceError> {
    let mut request = url.into_client_request()?;
    let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ParlanceError::HandshakeFailed("token is not a valid header value".into()))?;
    request.headers_mut().insert(AUTHORIZATION, bearer);
    if let Some(cursor) = cursor {
        let value = HeaderValue::from_str(cursor).map_err(|_| {
            ParlanceError::HandshakeFailed("replay cursor is not a valid header value".into())
        })?;
        request
            .headers_mut()
            .insert(HeaderName::from_static(RESUME_HEADER), value);
    }

    match connect_async(request).await {
        Ok((stream, _response)) => Ok(stream),
        // An HTTP rejection is an authoritative refusal, not a transient fault.
        Err(WsError::Http(response)) => Err(ParlanceError::HandshakeFailed(format!(
            "gateway rejected the handshake with status {}",
            response.status()
        ))),
        Err(error) => Err(error.into()),
    }
}

fn jittered(delay: Duration) -> Duration {
    delay + Duration::from_millis(rand::thread_rng().gen_range(0..500))
}

/// What one drive of a live socket ended with.
enum SocketOutcome {
    Shutdown,
    ProtocolError(String),
    Dropped,
}

/// Per-frame verdict from the protocol layer.
enum FrameControl {
    Continue,
    Retime(Duration),
    Fatal(String),
}

enum SocketEvent {
    Shutdown,
    Heartbeat,
    Frame(Option<Result<Message, WsError>>),
}

struct SocketActor {
    id: Uuid,
    url: String,
    token: String,
    reconnect: ReconnectConfig,
    heartbeat: Arc<Mutex<Duration>>,
    cursor: Arc<Mutex<Option<String>>>,
    feed: mpsc::Sender<GatewayItem>,
    shutdown: broadcast::Receiver<()>,
}

impl SocketActor {
    async fn run(mut self, first: WsStream) {
        let mut stream = Some(first);
        let mut delay = self.reconnect.initial_delay;

        loop {
            let socket = match stream.take() {
                Some(socket) => socket,
                None => {
                    let resume = self.cursor.lock().clone();
                    match handshake(&self.url, &self.token, resume.as_deref()).await {
                        Ok(socket) => {
                            info!(socket = %self.id, "gateway reconnected");
                            delay = self.reconnect.initial_delay;
                            socket
                        }
                        Err(error @ ParlanceError::HandshakeFailed(_)) => {
                            warn!(socket = %self.id, %error, "gateway refused the resume");
                            self.send_disconnect(Some(error.to_string()), true).await;
                            return;
                        }
                        Err(error) => {
                            debug!(socket = %self.id, %error, "reconnect attempt failed");
                            if self.backoff(&mut delay).await {
                                return;
                            }
                            continue;
                        }
                    }
                }
            };

            match self.drive(socket).await {
                SocketOutcome::Shutdown => {
                    self.send_disconnect(None, false).await;
                    return;
                }
                SocketOutcome::ProtocolError(message) => {
                    warn!(socket = %self.id, %message, "gateway signalled a protocol error");
                    self.send_disconnect(Some(message), true).await;
                    return;
                }
                SocketOutcome::Dropped => {
                    info!(socket = %self.id, "gateway connection dropped; reconnecting");
                    if self.backoff(&mut delay).await {
                        self.send_disconnect(None, false).await;
                        return;
                    }
                }
            }
        }
    }

    /// Sleeps the jittered backoff, doubling `delay` up to the configured
    /// ceiling. Returns true when shutdown arrived during the wait.
    async fn backoff(&mut self, delay: &mut Duration) -> bool {
        let wait = jittered(*delay);
        *delay = (*delay * 2).min(self.reconnect.max_delay);
        tokio::select! {
            biased;
            _ = self.shutdown.recv() => true,
            _ = tokio::time::sleep(wait) => false,
        }
    }

    /// Reads one live socket until it ends, pinging on the current heartbeat
    /// cadence and retiming when the gateway announces its own.
    async fn drive(&mut self, socket: WsStream) -> SocketOutcome {
        let (mut sink, mut source) = socket.split();
        let mut ticker = interval(*self.heartbeat.lock());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.reset(); // don't ping immediately after connecting

        loop {
            let event = tokio::select! {
                biased;
                _ = self.shutdown.recv() => SocketEvent::Shutdown,
                _ = ticker.tick() => SocketEvent::Heartbeat,
                frame = source.next() => SocketEvent::Frame(frame),
            };

            match event {
                SocketEvent::Shutdown => {
                    let frame = CloseFrame {
                        code: CloseCode::Normal,
                        reason: "client shutdown".into(),
                    };
                    let _ = sink.send(Message::Close(Some(frame))).await;
                    return SocketOutcome::Shutdown;
                }
                SocketEvent::Heartbeat => {
                    if let Err(error) = sink.send(Message::Text(HEARTBEAT_PAYLOAD.into())).await {
                        warn!(socket = %self.id, %error, "heartbeat write failed");
                        return SocketOutcome::Dropped;
                    }
                }
                SocketEvent::Frame(Some(Ok(Message::Text(text)))) => {
                    match self.handle_text(text.as_str()).await {
                        FrameControl::Continue => {}
                        FrameControl::Retime(period) => {
                            debug!(socket = %self.id, ?period, "heartbeat retimed by gateway");
                            ticker = interval_at(Instant::now() + period, period);
                            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        }
                        FrameControl::Fatal(message) => {
                            return SocketOutcome::ProtocolError(message);
                        }
                    }
                }
                SocketEvent::Frame(Some(Ok(Message::Close(frame)))) => {
                    debug!(socket = %self.id, ?frame, "server closed the socket");
                    return SocketOutcome::Dropped;
                }
                // Pings are answered by the protocol stack; binary frames are
                // not part of this gateway's contract.
                SocketEvent::Frame(Some(Ok(_))) => {}
                SocketEvent::Frame(Some(Err(error))) => {
                    warn!(socket = %self.id, %error, "gateway read failed");
                    return SocketOutcome::Dropped;
                }
                SocketEvent::Frame(None) => return SocketOutcome::Dropped,
            }
        }
    }

    /// Decodes one text frame and applies the protocol-reserved opcodes.
    async fn handle_text(&self, text: &str) -> FrameControl {
        let envelope = match Envelope::parse(text) {
            Ok(envelope) => envelope,
            Err(error) => {
                debug!(socket = %self.id, %error, "received undecodable frame");
                self.send(GatewayItem::Malformed(error)).await;
                return FrameControl::Continue;
            }
        };

        if let Some(cursor) = &envelope.last_event_cursor {
            *self.cursor.lock() = Some(cursor.clone());
        }

        match envelope.opcode {
            opcode::WELCOME => {
                let payload = envelope.payload.clone().unwrap_or_default();
                let control = match serde_json::from_value::<Welcome>(payload) {
                    Ok(welcome) if welcome.heartbeat_interval_ms > 0 => {
                        let period = Duration::from_millis(welcome.heartbeat_interval_ms);
                        *self.heartbeat.lock() = period;
                        FrameControl::Retime(period)
                    }
                    Ok(_) => {
                        debug!(socket = %self.id, "welcome announced a zero heartbeat; keeping the current cadence");
                        FrameControl::Continue
                    }
                    Err(error) => {
                        self.send(GatewayItem::Malformed(ParlanceError::MalformedEnvelope(
                            format!("welcome payload: {error}"),
                        )))
                        .await;
                        FrameControl::Continue
                    }
                };
                // Typed Welcome subscribers still see the frame.
                self.send(GatewayItem::Frame(envelope)).await;
                control
            }
            opcode::ERROR => {
                let payload = envelope.payload.clone().unwrap_or_default();
                let message = serde_json::from_value::<ErrorFrame>(payload)
                    .map(|frame| frame.message)
                    .unwrap_or_default();
                let message = if message.is_empty() {
                    "gateway error".to_string()
                } else {
                    message
                };
                FrameControl::Fatal(message)
            }
            _ => {
                self.send(GatewayItem::Frame(envelope)).await;
                FrameControl::Continue
            }
        }
    }

    /// The feed is bounded; waiting here is what keeps frame handling
    /// in-order under load.
    async fn send(&self, item: GatewayItem) {
        if self.feed.send(item).await.is_err() {
            debug!(socket = %self.id, "feed receiver is gone; dropping item");
        }
    }

    async fn send_disconnect(&self, message: Option<String>, protocol_error: bool) {
        self.send(GatewayItem::Disconnected(DisconnectEvent {
            message,
            protocol_error,
        }))
        .await;
    }
}
