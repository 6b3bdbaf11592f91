//! Paging Gateway Protocol Library
//!
//! This crate provides the typed vocabulary shared by the gateway engine,
//! the simulators and any external adapter:
//!
//! - **Tag addressing**: node identifiers, tag values, and the
//!   `{entity}-{field}` naming convention used by the operator-facing
//!   tag space
//! - **Switch actions**: the call-control requests the gateway submits
//!   (originate, redirect, variable set, conference kick), rendered as
//!   ordered key/value field maps
//! - **Switch events**: typed records for the asynchronous event stream
//!   (channel state, peer reachability, conference and queue activity)
//! - **Extension status**: the status byte written to per-station tags
//!   and its mappings from raw switch-side strings
//!
//! # Tag naming
//!
//! Tag names are hierarchical with `-` separators; the last segment is
//! the field and the remainder is the entity. This format is load-bearing:
//! the dispatcher classifies subscriptions by splitting on the final dash.
//!
//! # Example
//!
//! ```rust
//! use page_protocol::{split_tag_name, ExtensionStatus};
//!
//! let (entity, field) = split_tag_name("E2-TEL-101-CALL").unwrap();
//! assert_eq!(entity, "E2-TEL-101");
//! assert_eq!(field, "CALL");
//!
//! assert_eq!(ExtensionStatus::from_channel_state("Ringing"), ExtensionStatus::Ringing);
//! ```

pub mod action;
pub mod channel;
pub mod error;
pub mod event;
pub mod status;
pub mod tag;

pub use action::{RedirectKind, SubmitResult, SwitchAction, MANUAL_PAGING_GROUP};
pub use channel::channel_extension;
pub use error::ProtocolError;
pub use event::{ConferencePhase, QueuePhase, SwitchEvent};
pub use status::ExtensionStatus;
pub use tag::{
    split_tag_name, CallingField, ElementField, PagingField, TagNodeId, TagValue,
};
