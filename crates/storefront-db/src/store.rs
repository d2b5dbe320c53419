//! Order store trait
//!
//! Defines the async storage interface the fulfillment pipeline writes
//! through. The contract is deliberately minimal: a single idempotent
//! create keyed by (customer id, session id). No reads are needed by the
//! write path; the storefront UI reads orders through its own layer.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::StoreResult;

/// Order store trait
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create an order record for (customer id, session id).
    ///
    /// Must be atomic and idempotent: if a record already exists for the
    /// key, the call succeeds with [`WriteOutcome::AlreadyExists`] and the
    /// existing record is left untouched. Two concurrent calls for the
    /// same key must result in exactly one stored record.
    async fn create_order(&self, order: CreateOrder) -> StoreResult<WriteOutcome>;
}

/// Create order input
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: String,
    pub session_id: String,
    /// Amount in major currency units
    pub amount: Decimal,
    /// Shipping amount in major currency units
    pub amount_shipping: Decimal,
    /// Product image URLs for the purchased items
    pub images: Vec<String>,
}

/// Outcome of an idempotent create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A new record was written
    Created,
    /// A record already existed for the key; nothing was written
    AlreadyExists,
}
