use page_protocol::ProtocolError;
use thiserror::Error;

/// Errors raised while building or running the gateway model.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("duplicate element: {0}")]
    DuplicateElement(String),

    #[error("duplicate zone: {0}")]
    DuplicateZone(String),

    #[error("group {group} bit {bit} out of range 0..8")]
    GroupBitOutOfRange { group: String, bit: u8 },

    #[error("unknown message index {0}")]
    UnknownMessage(u8),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
