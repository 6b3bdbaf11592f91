use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("the gateway is no longer running")]
    GatewayClosed,
}
