//! Error types for vdr-engine
//!
//! Every failure here is recoverable at the call site. VIN decoding distinguishes
//! `NotFound` (offer manual entry) from `DecodeFailed` (offer retry); catalog queries
//! degrade to empty lists before reaching the caller.

use thiserror::Error;

/// Engine error taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Caller precondition violation (e.g. malformed VIN). Never sent to the network.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cascade step invoked out of order (e.g. model before make). Never sent to the network.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Upstream answered but no identifiable vehicle was found
    #[error("Vehicle not found: {0}")]
    NotFound(String),

    /// VIN registry unreachable or returned a non-success status
    #[error("VIN decode failed: {0}")]
    DecodeFailed(String),

    /// Catalog backend unreachable or returned a non-success status
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl ResolveError {
    /// True when the caller should offer switching to manual entry
    pub fn offers_manual_entry(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }

    /// True when the same request may succeed if repeated later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ResolveError::DecodeFailed(_) | ResolveError::CatalogUnavailable(_)
        )
    }

    /// True for caller-side violations that never reached the network
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ResolveError::InvalidInput(_) | ResolveError::PreconditionFailed(_)
        )
    }
}

/// Result type for engine operations
pub type ResolveResult<T> = Result<T, ResolveError>;
