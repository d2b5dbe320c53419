//! Fulfillment errors

use thiserror::Error;

/// Errors raised while processing one webhook delivery
#[derive(Error, Debug)]
pub enum FulfillmentError {
    /// Authenticity failure: bad MAC, missing header pieces, or a stale
    /// timestamp. The body is never processed after this.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Verified but semantically unusable: required fields absent or of
    /// the wrong shape. Recoverable by redelivery after a fix.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Storage collaborator unavailable or rejected the write. Redelivery
    /// is safe because the write is idempotent.
    #[error("order write failed: {0}")]
    WriteFailed(#[from] storefront_db::StoreError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl FulfillmentError {
    /// Whether redelivery of the same event can recover this failure
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedEvent(_) | Self::WriteFailed(_))
    }
}
