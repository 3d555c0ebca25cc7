//! Engine bridge abstraction
//!
//! The engine lives in another process (or thread). Everything the board
//! knows about it goes through [`EngineBridge`]: named commands with JSON
//! arguments answered by a JSON value, plus a push channel for events the
//! engine emits on its own.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use shared::protocol::PushMessage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Errors surfaced by the bridge or while decoding an engine reply
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The call never reached the engine
    #[error("Transport failure: {message}")]
    Transport { message: String },

    /// The engine answered with an error string
    #[error("Engine rejected {command}: {message}")]
    Engine { command: String, message: String },

    /// The reply did not have the expected shape
    #[error("Malformed reply to {command}: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// The bridge has shut down
    #[error("Engine bridge closed")]
    Closed,
}

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Request/response plus push transport to the engine
#[async_trait]
pub trait EngineBridge: Send + Sync + 'static {
    /// Call `command` with `args` and wait for the engine's reply.
    async fn invoke(&self, command: &str, args: Value) -> BridgeResult<Value>;

    /// Start receiving push events. Dropping the [`Subscription`] releases it.
    fn subscribe(&self) -> Subscription;
}

type Release = Box<dyn FnOnce(u64) + Send>;

/// Scoped push subscription
///
/// The release hook runs exactly once, on drop, which also covers drops
/// during unwinding.
pub struct Subscription {
    id: u64,
    receiver: mpsc::UnboundedReceiver<PushMessage>,
    release: Option<Release>,
}

impl Subscription {
    pub fn new(
        id: u64,
        receiver: mpsc::UnboundedReceiver<PushMessage>,
        release: impl FnOnce(u64) + Send + 'static,
    ) -> Self {
        Self {
            id,
            receiver,
            release: Some(Box::new(release)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next push event, `None` once the bridge side is gone
    pub async fn recv(&mut self) -> Option<PushMessage> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<PushMessage> {
        self.receiver.try_recv().ok()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.release.is_none())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            debug!("[BRIDGE] Releasing push subscription {}", self.id);
            release(self.id);
        }
    }
}

/// Fan-out table of push subscribers, for bridge implementations
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    next_id: Arc<AtomicU64>,
    senders: Arc<Mutex<HashMap<u64, mpsc::UnboundedSender<PushMessage>>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().insert(id, tx);
        debug!("[BRIDGE] Push subscription {} opened", id);

        let senders = Arc::clone(&self.senders);
        Subscription::new(id, rx, move |id| {
            senders.lock().remove(&id);
        })
    }

    /// Deliver `message` to every live subscriber, returns how many got it.
    pub fn broadcast(&self, message: &PushMessage) -> usize {
        let mut senders = self.senders.lock();
        senders.retain(|id, tx| {
            let delivered = tx.send(message.clone()).is_ok();
            if !delivered {
                warn!("[BRIDGE] Dropping dead push subscriber {}", id);
            }
            delivered
        });
        senders.len()
    }

    pub fn len(&self) -> usize {
        self.senders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
