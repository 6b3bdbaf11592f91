//! Gateway Simulation Library
//!
//! This crate provides a simulation layer for testing the paging
//! gateway without a live address space or call switch. It includes:
//!
//! - **VirtualTagSpace**: an in-memory tag space the model binds into
//! - **VirtualSwitch**: records submitted actions and injects events
//! - **SimGateway**: the full actor wired between the two
//!
//! # Example
//!
//! ```rust,no_run
//! use page_protocol::TagValue;
//! use page_sim::SimGateway;
//!
//! # async fn demo(config: page_engine::GatewayConfig) {
//! let gateway = SimGateway::start(&config).unwrap();
//! gateway
//!     .tags
//!     .operator_write("Paging-Live", TagValue::Bool(true))
//!     .await
//!     .unwrap();
//! # }
//! ```

pub mod error;
pub mod harness;
pub mod switch;
pub mod tagspace;

pub use error::SimError;
pub use harness::SimGateway;
pub use switch::VirtualSwitch;
pub use tagspace::{TagSpaceHandle, VirtualTagSpace};
