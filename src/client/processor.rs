// src/client/processor.rs

//! Consumes the gateway feed one item at a time: dispatch first, then command
//! routing, each run to completion before the next frame is taken.

use super::registry::EventKind;
use crate::commands::CommandRouter;
use crate::dispatch::DispatchTable;
use crate::gateway::envelope::Envelope;
use crate::gateway::{DisconnectEvent, GatewayItem};
use crate::model::MessageEvent;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

pub(crate) struct Processor {
    table: Arc<DispatchTable>,
    router: Option<Arc<CommandRouter>>,
    feed: mpsc::Receiver<GatewayItem>,
    disconnects: broadcast::Sender<DisconnectEvent>,
}

impl Processor {
    pub(crate) fn new(
        table: Arc<DispatchTable>,
        router: Option<Arc<CommandRouter>>,
        feed: mpsc::Receiver<GatewayItem>,
        disconnects: broadcast::Sender<DisconnectEvent>,
    ) -> Self {
        Self {
            table,
            router,
            feed,
            disconnects,
        }
    }

    /// Runs until every socket feeding this processor has hung up.
    pub(crate) async fn run(mut self) {
        while let Some(item) = self.feed.recv().await {
            match item {
                GatewayItem::Frame(frame) => self.process(&frame).await,
                GatewayItem::Malformed(error) => self.table.report(None, error),
                GatewayItem::Disconnected(event) => {
                    // A send error only means nobody is watching disconnects.
                    let _ = self.disconnects.send(event);
                }
            }
        }
    }

    /// Handles one frame to completion: typed dispatch, then command routing
    /// for chat messages when a command tree is configured.
    async fn process(&self, frame: &Envelope) {
        self.table.dispatch(frame);

        let Some(router) = &self.router else {
            return;
        };
        if frame.event_name.as_deref() != Some(EventKind::ChatMessageCreated.wire_name()) {
            return;
        }

        let payload = frame.payload.clone().unwrap_or(Value::Null);
        // A payload that does not decode already failed inside dispatch and
        // was reported there; routing just skips it.
        let Ok(event) = serde_json::from_value::<MessageEvent>(payload) else {
            return;
        };
        if let Err(error) = router.route(&Arc::new(event)).await {
            warn!(%error, "command handler failed");
        }
    }
}
