//! PostgreSQL order store implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::store::{CreateOrder, OrderStore, WriteOutcome};

/// PostgreSQL order store
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new order store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create_order(&self, order: CreateOrder) -> StoreResult<WriteOutcome> {
        // ON CONFLICT DO NOTHING makes redelivery and concurrent delivery
        // of the same session race-safe without any in-process locking.
        let result = sqlx::query(
            r#"
            INSERT INTO orders (customer_id, session_id, amount, amount_shipping, images)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (customer_id, session_id) DO NOTHING
            "#,
        )
        .bind(&order.customer_id)
        .bind(&order.session_id)
        .bind(order.amount)
        .bind(order.amount_shipping)
        .bind(&order.images)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(WriteOutcome::AlreadyExists)
        } else {
            Ok(WriteOutcome::Created)
        }
    }
}
