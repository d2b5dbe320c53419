//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Order row from the database
///
/// Keyed by (customer_id, session_id). Rows are created exactly once per
/// key and never mutated afterwards.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub customer_id: String,
    pub session_id: String,
    pub amount: Decimal,
    pub amount_shipping: Decimal,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}
