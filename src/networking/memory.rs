//! In-process engine bridge
//!
//! [`MemoryBridge`] answers commands with a programmable handler and keeps a
//! log of every call, so a board session can be driven without a real
//! engine process. [`ScriptedEngine`] is a ready-made handler that serves a
//! fixed board, meta snapshot and move table.

use super::bridge::{BridgeError, BridgeResult, EngineBridge, SubscriberRegistry, Subscription};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared::protocol::{commands, PushMessage, RawBoard, WireGameMeta, WireMoveList};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::debug;

type Handler = Box<dyn FnMut(&str, &Value) -> BridgeResult<Value> + Send>;

/// A recorded `invoke` call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub command: String,
    pub args: Value,
}

pub struct MemoryBridge {
    handler: Mutex<Handler>,
    calls: Mutex<Vec<Call>>,
    delays: Mutex<HashMap<String, Duration>>,
    failing: Mutex<HashSet<String>>,
    subscribers: SubscriberRegistry,
}

impl MemoryBridge {
    pub fn new(handler: impl FnMut(&str, &Value) -> BridgeResult<Value> + Send + 'static) -> Self {
        Self {
            handler: Mutex::new(Box::new(handler)),
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            subscribers: SubscriberRegistry::new(),
        }
    }

    pub fn serving(mut engine: ScriptedEngine) -> Self {
        Self::new(move |command, args| engine.handle(command, args))
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, command: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.command == command)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Hold replies to `command` back by `delay`
    pub fn set_delay(&self, command: &str, delay: Duration) {
        self.delays.lock().insert(command.to_owned(), delay);
    }

    /// Make `command` fail with a transport error until [`Self::recover`]
    pub fn fail(&self, command: &str) {
        self.failing.lock().insert(command.to_owned());
    }

    pub fn recover(&self, command: &str) {
        self.failing.lock().remove(command);
    }

    /// Emit a push event, returns how many subscribers received it
    pub fn push(&self, message: PushMessage) -> usize {
        self.subscribers.broadcast(&message)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[async_trait]
impl EngineBridge for MemoryBridge {
    async fn invoke(&self, command: &str, args: Value) -> BridgeResult<Value> {
        self.calls.lock().push(Call {
            command: command.to_owned(),
            args: args.clone(),
        });

        let delay = self.delays.lock().get(command).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().contains(command) {
            debug!("[BRIDGE] Simulated failure for {}", command);
            return Err(BridgeError::Transport {
                message: format!("{} unavailable", command),
            });
        }

        let mut handler = self.handler.lock();
        (*handler)(command, &args)
    }

    fn subscribe(&self) -> Subscription {
        self.subscribers.subscribe()
    }
}

/// Minimal engine double: serves whatever board and meta it holds
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    pub board: RawBoard,
    pub meta: WireGameMeta,
    /// Move options keyed by square label, for hover and click
    pub moves: HashMap<String, WireMoveList>,
}

impl ScriptedEngine {
    pub fn new(board: RawBoard, meta: WireGameMeta) -> Self {
        Self {
            board,
            meta,
            moves: HashMap::new(),
        }
    }

    pub fn with_moves(mut self, square: &str, moves: WireMoveList) -> Self {
        self.moves.insert(square.to_owned(), moves);
        self
    }

    fn moves_for(&self, args: &Value) -> WireMoveList {
        args.get("square")
            .and_then(Value::as_str)
            .and_then(|square| self.moves.get(square))
            .cloned()
            .unwrap_or_default()
    }

    pub fn handle(&mut self, command: &str, args: &Value) -> BridgeResult<Value> {
        let reply = match command {
            commands::NEW_GAME => {
                self.board = RawBoard::standard();
                self.meta = WireGameMeta::default();
                json!(self.board)
            }
            commands::GET_STATE => json!(self.board),
            commands::GET_SCORE => json!(self.meta),
            commands::HOVER_SQUARE => json!(self.moves_for(args)),
            commands::CLICK_SQUARE => json!([self.moves_for(args), self.board, self.meta]),
            commands::DROP_SQUARE | commands::PROMOTE => Value::Null,
            other => {
                return Err(BridgeError::Engine {
                    command: other.to_owned(),
                    message: "unknown command".to_owned(),
                })
            }
        };
        Ok(reply)
    }
}
