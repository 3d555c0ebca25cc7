//! Engine communication
//!
//! - [`bridge`] - transport trait, push subscriptions, bridge errors
//! - [`adapter`] - wire ↔ model translation and typed requests
//! - [`memory`] - in-process bridge used by tests and the demo session

pub mod adapter;
pub mod bridge;
pub mod memory;

pub use adapter::{ClickOutcome, EnginePush, RemoteStateAdapter, Reply, Request};
pub use bridge::{BridgeError, BridgeResult, EngineBridge, SubscriberRegistry, Subscription};
pub use memory::{Call, MemoryBridge, ScriptedEngine};
