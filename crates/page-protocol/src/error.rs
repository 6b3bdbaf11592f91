//! Error types for tag-name and channel-name parsing

use thiserror::Error;

/// Errors that can occur while interpreting tag or channel names
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Tag name does not contain the `-` entity/field separator
    #[error("tag name has no field separator: {0}")]
    MissingSeparator(String),

    /// Field segment is not a recognized element control
    #[error("unknown element field: {0}")]
    UnknownElementField(String),

    /// Tag name is not a recognized paging control
    #[error("unknown paging tag: {0}")]
    UnknownPagingTag(String),

    /// Tag name is not a recognized calling control
    #[error("unknown calling tag: {0}")]
    UnknownCallingTag(String),

    /// Channel name cannot be reduced to an extension
    #[error("malformed channel name: {0}")]
    MalformedChannel(String),
}
