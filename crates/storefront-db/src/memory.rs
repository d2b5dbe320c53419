//! In-memory order store
//!
//! Backing store for tests and local development. The whole map sits
//! behind one mutex, so check-and-insert is atomic and the idempotency
//! contract holds under concurrent deliveries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StoreResult;
use crate::models::OrderRow;
use crate::store::{CreateOrder, OrderStore, WriteOutcome};

/// In-memory order store
#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    orders: Arc<Mutex<HashMap<(String, String), OrderRow>>>,
}

impl MemoryOrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders
    pub fn len(&self) -> usize {
        self.orders.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the store holds no orders
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a stored order by key
    pub fn get(&self, customer_id: &str, session_id: &str) -> Option<OrderRow> {
        self.orders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(customer_id.to_string(), session_id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create_order(&self, order: CreateOrder) -> StoreResult<WriteOutcome> {
        let mut orders = self.orders.lock().unwrap_or_else(|e| e.into_inner());
        let key = (order.customer_id.clone(), order.session_id.clone());

        if orders.contains_key(&key) {
            return Ok(WriteOutcome::AlreadyExists);
        }

        orders.insert(
            key,
            OrderRow {
                customer_id: order.customer_id,
                session_id: order.session_id,
                amount: order.amount,
                amount_shipping: order.amount_shipping,
                images: order.images,
                created_at: Utc::now(),
            },
        );

        Ok(WriteOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn sample_order() -> CreateOrder {
        CreateOrder {
            customer_id: "buyer@example.com".to_string(),
            session_id: "cs_test_123".to_string(),
            amount: Decimal::new(2599, 2),
            amount_shipping: Decimal::new(499, 2),
            images: vec!["https://img.example.com/1.jpg".to_string()],
        }
    }

    #[tokio::test]
    async fn first_write_creates() {
        let store = MemoryOrderStore::new();
        let outcome = store.create_order(sample_order()).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Created);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn second_write_is_noop() {
        let store = MemoryOrderStore::new();
        store.create_order(sample_order()).await.unwrap();

        let outcome = store.create_order(sample_order()).await.unwrap();
        assert_eq!(outcome, WriteOutcome::AlreadyExists);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn existing_record_is_untouched() {
        let store = MemoryOrderStore::new();
        store.create_order(sample_order()).await.unwrap();

        let mut second = sample_order();
        second.amount = Decimal::new(9999, 2);
        store.create_order(second).await.unwrap();

        let row = store.get("buyer@example.com", "cs_test_123").unwrap();
        assert_eq!(row.amount, Decimal::new(2599, 2));
    }
}
