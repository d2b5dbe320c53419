//! Storefront DB - Order storage abstractions
//!
//! SQLx-based storage layer for the fulfillment pipeline. The only write
//! operation this layer exposes is an idempotent "create order record at
//! key": redelivering the same checkout session is a no-op after the first
//! successful write.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_db::{create_pool, OrderStore, PgOrderStore};
//!
//! let pool = create_pool("postgres://localhost/storefront").await?;
//! let store = PgOrderStore::new(pool);
//!
//! let outcome = store.create_order(order).await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryOrderStore;
pub use models::OrderRow;
pub use pg::PgOrderStore;
pub use pool::{create_pool, DbPool};
pub use store::{CreateOrder, OrderStore, WriteOutcome};
