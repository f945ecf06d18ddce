// src/dispatch/mod.rs

//! The event dispatch table: one typed broadcast channel per registered key.
//!
//! Every inbound frame is looked up by its [`EventKey`] in a single
//! registration-ordered map. A hit decodes the payload into the type
//! registered for that key and publishes it on that key's channel; a miss
//! drops the frame. Decode and transform failures never escape the table:
//! they are forwarded to a dedicated error channel and the frame is dropped.

use crate::errors::ParlanceError;
use crate::gateway::envelope::Envelope;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use tokio::sync::broadcast;
use tracing::debug;

/// Identifies one kind of gateway frame: protocol frames by opcode, domain
/// events by name. Two keys are equal only when both the tag and the value
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    Opcode(u8),
    Name(String),
}

impl EventKey {
    pub fn opcode(op: u8) -> Self {
        EventKey::Opcode(op)
    }

    pub fn name(name: impl Into<String>) -> Self {
        EventKey::Name(name.into())
    }

    /// The key a frame is dispatched under: its event name when present,
    /// otherwise its opcode.
    pub fn for_frame(frame: &Envelope) -> Self {
        match &frame.event_name {
            Some(name) => EventKey::Name(name.clone()),
            None => EventKey::Opcode(frame.opcode),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Opcode(op) => write!(f, "opcode {op}"),
            EventKey::Name(name) => write!(f, "{name}"),
        }
    }
}

/// An error raised while dispatching a single frame. `key` is `None` when the
/// frame never decoded far enough to be keyed.
#[derive(Debug, Clone)]
pub struct DispatchError {
    pub key: Option<EventKey>,
    pub error: ParlanceError,
}

/// Rewrites a raw payload before it is decoded into the registered type.
type Transform = dyn Fn(Value) -> Result<Value, ParlanceError> + Send + Sync;

/// Decodes a payload and publishes it on the entry's channel, returning the
/// number of receivers that saw it.
type Publish = dyn Fn(Value) -> Result<usize, ParlanceError> + Send + Sync;

/// One registered event: the decode/publish closure plus the typed sender,
/// kept as `Any` so subscribers can recover the concrete channel type.
struct DispatchEntry {
    key: EventKey,
    transform: Option<Box<Transform>>,
    publish: Box<Publish>,
    sender: Box<dyn Any + Send + Sync>,
}

/// Builds a [`DispatchTable`]. Registration order is preserved; registering
/// the same key twice replaces the earlier entry.
pub struct DispatchTableBuilder {
    capacity: usize,
    entries: IndexMap<EventKey, DispatchEntry>,
}

impl DispatchTableBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: IndexMap::new(),
        }
    }

    /// Registers `key` with a direct decode into `T`.
    pub fn register<T>(self, key: EventKey) -> Self
    where
        T: DeserializeOwned + Clone + Send + 'static,
    {
        self.insert::<T>(key, None)
    }

    /// Registers `key` with a payload transform applied before decoding.
    pub fn register_with<T, F>(self, key: EventKey, transform: F) -> Self
    where
        T: DeserializeOwned + Clone + Send + 'static,
        F: Fn(Value) -> Result<Value, ParlanceError> + Send + Sync + 'static,
    {
        self.insert::<T>(key, Some(Box::new(transform)))
    }

    fn insert<T>(mut self, key: EventKey, transform: Option<Box<Transform>>) -> Self
    where
        T: DeserializeOwned + Clone + Send + 'static,
    {
        let (sender, _) = broadcast::channel::<T>(self.capacity);
        let publish_sender = sender.clone();
        let label = key.to_string();
        let publish = Box::new(move |value: Value| -> Result<usize, ParlanceError> {
            let decoded: T =
                serde_json::from_value(value).map_err(|e| ParlanceError::EventDecode {
                    event: label.clone(),
                    detail: e.to_string(),
                })?;
            // A send error only means nobody is listening right now.
            Ok(publish_sender.send(decoded).unwrap_or(0))
        });

        let entry = DispatchEntry {
            key: key.clone(),
            transform,
            publish,
            sender: Box::new(sender),
        };
        self.entries.insert(key, entry);
        self
    }

    pub fn build(self) -> DispatchTable {
        let (errors, _) = broadcast::channel(self.capacity);
        DispatchTable {
            entries: self.entries,
            errors,
        }
    }
}

/// The frame-to-subscriber fan-out. Immutable once built; the registration
/// map is the sole authority on which frames this client understands.
pub struct DispatchTable {
    entries: IndexMap<EventKey, DispatchEntry>,
    errors: broadcast::Sender<DispatchError>,
}

impl DispatchTable {
    pub fn builder(capacity: usize) -> DispatchTableBuilder {
        DispatchTableBuilder::new(capacity)
    }

    /// Routes one frame. Unknown keys are dropped without logging; failures
    /// on registered keys go to the error channel and processing continues.
    pub fn dispatch(&self, frame: &Envelope) {
        let key = EventKey::for_frame(frame);
        let Some(entry) = self.entries.get(&key) else {
            return;
        };

        let payload = frame.payload.clone().unwrap_or(Value::Null);
        let result = match &entry.transform {
            Some(transform) => transform(payload).and_then(|value| (entry.publish)(value)),
            None => (entry.publish)(payload),
        };

        if let Err(error) = result {
            debug!(key = %entry.key, %error, "dropping frame for registered event");
            self.report(Some(entry.key.clone()), error);
        }
    }

    /// Subscribes to the typed channel registered under `key`. Returns `None`
    /// when the key is unregistered or `T` is not the registered type.
    pub fn subscribe<T>(&self, key: &EventKey) -> Option<broadcast::Receiver<T>>
    where
        T: Clone + Send + 'static,
    {
        let entry = self.entries.get(key)?;
        entry
            .sender
            .downcast_ref::<broadcast::Sender<T>>()
            .map(|sender| sender.subscribe())
    }

    /// Subscribes to dispatch failures.
    pub fn errors(&self) -> broadcast::Receiver<DispatchError> {
        self.errors.subscribe()
    }

    /// Forwards an error to the error channel on behalf of the read loop.
    pub(crate) fn report(&self, key: Option<EventKey>, error: ParlanceError) {
        let _ = self.errors.send(DispatchError { key, error });
    }

    pub fn contains(&self, key: &EventKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &EventKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}
