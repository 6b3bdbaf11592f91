//! Paging Gateway Engine
//!
//! This crate binds an operator-facing tag space to a telephony call
//! switch: tag writes become switch actions, switch events become tag
//! updates.
//!
//! # Architecture
//!
//! All state lives in a [`GatewayEngine`] owned by a single actor task.
//! Inbound traffic arrives on channels (operator tag changes, switch
//! events, internal commands) and each event is handled synchronously,
//! returning [`Effect`]s that the actor executes through the
//! [`CallOrchestrator`]. The automatic paging scheduler runs as a
//! supervised child task controlled over a `watch` channel.
//!
//! The engine is transport-free: both the tag space and the call
//! switch sit behind channel ports, so the same actor runs against a
//! live deployment or against the simulator in `page-sim`.
//!
//! # Example
//!
//! ```rust,no_run
//! use page_engine::{bind_model, GatewayConfig, NodeBinder};
//! use page_protocol::{TagNodeId, TagValue};
//!
//! struct Binder(u32);
//! impl NodeBinder for Binder {
//!     fn folder(&mut self, _name: &str) {}
//!     fn node(&mut self, _name: &str, _initial: TagValue, _writable: bool) -> TagNodeId {
//!         self.0 += 1;
//!         TagNodeId(self.0)
//!     }
//! }
//!
//! let config: GatewayConfig = serde_json::from_str("{\"elements\":[],\"zones\":[]}").unwrap();
//! let engine = bind_model(&config, &mut Binder(0)).unwrap();
//! ```

pub mod actor;
pub mod config;
pub mod dispatch;
pub mod element;
pub mod engine;
pub mod error;
pub mod events;
pub mod group;
pub mod orchestrator;
pub mod paging;
pub mod ports;
pub mod scheduler;
pub mod setup;

// Re-export actor types
pub use actor::{run_gateway_actor, GatewayChannels, GatewayCommand};

// Re-export model types
pub use config::{GatewayConfig, MessageEntry};
pub use element::{Element, ElementKind, ElementRegistry, Zone, MASTER_ZONE};
pub use group::GroupStatusAggregator;

// Re-export engine types
pub use dispatch::{RouteKey, RouteTable};
pub use engine::{CallingNodes, Effect, GatewayEngine};
pub use error::EngineError;
pub use events::GatewayEvent;
pub use paging::{PagingIntent, PagingNodes, PagingStateMachine};
pub use ports::{SwitchHandle, SwitchSubmit, TagChange, TagLink, TagRequest};
pub use scheduler::{AutoControl, AutoGroup, AutoScheduler};
pub use setup::{bind_model, NodeBinder};
