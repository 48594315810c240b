//! Error types shared across the facet crates.
//!
//! Gateway implementations map transport and decode failures into
//! [`FacetError::Gateway`] / [`FacetError::Malformed`]; the resolver itself
//! degrades fetch failures into empty option sets (see `resolver`) and only
//! returns errors for caller mistakes.

use thiserror::Error;

/// Result alias used throughout the facet crates.
pub type FacetResult<T> = Result<T, FacetError>;

#[derive(Debug, Error)]
pub enum FacetError {
    /// A caller supplied an argument the engine cannot act on
    /// (wrong value kind for a dimension, value not in the current option set, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A gateway call failed at the transport level.
    #[error("gateway: {0}")]
    Gateway(String),

    /// A gateway response could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FacetError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
