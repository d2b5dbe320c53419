//! Storefront Fulfillment Core - webhook intake business logic
//!
//! Takes one raw Stripe webhook delivery through the pipeline
//! verify -> classify -> write:
//!
//! 1. [`WebhookVerifier`] authenticates the raw payload against the
//!    signing secret and decodes it into a [`VerifiedEvent`].
//! 2. [`classify`] routes `checkout.session.completed` events onward as a
//!    [`CheckoutSession`] and drops everything else.
//! 3. [`FulfillmentService`] records an order through an idempotent
//!    store write, so Stripe redelivery is always safe.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_db::MemoryOrderStore;
//! use storefront_fulfillment_core::{FulfillmentService, WebhookVerifier};
//!
//! let verifier = WebhookVerifier::new("whsec_...");
//! let service = FulfillmentService::new(verifier, Arc::new(MemoryOrderStore::new()));
//!
//! let outcome = service.process_delivery(&body, signature).await?;
//! ```

pub mod error;
pub mod event;
pub mod service;
pub mod webhook;

pub use error::FulfillmentError;
pub use event::{classify, minor_to_major, CheckoutSession, Disposition};
pub use service::{DeliveryOutcome, FulfillmentService};
pub use webhook::{EventType, VerifiedEvent, WebhookVerifier};
