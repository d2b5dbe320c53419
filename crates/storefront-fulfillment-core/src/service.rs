//! Fulfillment service
//!
//! Orchestrates one webhook delivery through verify -> classify -> write.
//! Nothing is queued for later: every failure resolves at the boundary of
//! the request, and retries are delegated to the processor's redelivery.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use storefront_db::{CreateOrder, OrderStore, WriteOutcome};

use crate::error::FulfillmentError;
use crate::event::{classify, CheckoutSession, Disposition};
use crate::webhook::WebhookVerifier;

/// Result of processing one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// First successful write for this session
    Fulfilled,
    /// The session was already recorded; the redelivery was a no-op
    AlreadyRecorded,
    /// Event type this system does not act on
    Ignored,
}

/// Processes webhook deliveries end to end
#[derive(Clone)]
pub struct FulfillmentService {
    verifier: WebhookVerifier,
    store: Arc<dyn OrderStore>,
}

impl FulfillmentService {
    /// Create a new fulfillment service
    pub fn new(verifier: WebhookVerifier, store: Arc<dyn OrderStore>) -> Self {
        Self { verifier, store }
    }

    /// Process one raw delivery: verify the signature, classify the event,
    /// and record an order for checkout-completed events.
    ///
    /// The payload must be the complete, untouched request body.
    #[instrument(skip_all)]
    pub async fn process_delivery(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<DeliveryOutcome, FulfillmentError> {
        let event = self.verifier.verify_and_decode(payload, signature)?;
        debug!(
            event_id = %event.id,
            event_type = %event.event_type.as_str(),
            "Verified webhook delivery"
        );

        match classify(&event)? {
            Disposition::Ignored => {
                info!(
                    event_id = %event.id,
                    event_type = %event.event_type.as_str(),
                    "Ignoring event type"
                );
                Ok(DeliveryOutcome::Ignored)
            }
            Disposition::Fulfillable(session) => self.fulfill(&event.id, session).await,
        }
    }

    /// Durably record the order for a checkout session, exactly once per
    /// (customer id, session id) regardless of delivery count.
    async fn fulfill(
        &self,
        event_id: &str,
        session: CheckoutSession,
    ) -> Result<DeliveryOutcome, FulfillmentError> {
        let session_id = session.session_id.clone();
        let customer_id = session.customer_id.clone();

        let outcome = self
            .store
            .create_order(CreateOrder {
                customer_id: session.customer_id,
                session_id: session.session_id,
                amount: session.amount,
                amount_shipping: session.amount_shipping,
                images: session.images,
            })
            .await?;

        match outcome {
            WriteOutcome::Created => {
                info!(
                    event_id = %event_id,
                    session_id = %session_id,
                    customer_id = %customer_id,
                    "Order recorded"
                );
                Ok(DeliveryOutcome::Fulfilled)
            }
            WriteOutcome::AlreadyExists => {
                warn!(
                    event_id = %event_id,
                    session_id = %session_id,
                    "Redelivery for already-recorded session"
                );
                Ok(DeliveryOutcome::AlreadyRecorded)
            }
        }
    }
}
