//! Stripe webhook handler

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use storefront_fulfillment_core::{DeliveryOutcome, FulfillmentError};

use crate::state::AppState;

/// POST /webhooks/stripe
///
/// Handle Stripe webhook events with signature verification. The `Bytes`
/// extractor hands over the raw request body untouched; the route must
/// never go through a JSON extractor or the signature would not match.
///
/// The status code is the sole signal Stripe acts on: 2xx acknowledges
/// the delivery, anything else schedules a redelivery. Redelivery is safe
/// because the order write is idempotent.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let start = Instant::now();

    // Extract Stripe signature header
    let Some(sig_header) = headers.get("stripe-signature") else {
        tracing::warn!("Missing Stripe-Signature header");
        return StatusCode::BAD_REQUEST;
    };

    let Ok(signature) = sig_header.to_str() else {
        tracing::warn!("Invalid Stripe-Signature header encoding");
        return StatusCode::BAD_REQUEST;
    };

    // Process the delivery
    match state.fulfillment.process_delivery(&body, signature).await {
        Ok(outcome) => {
            metrics::counter!("fulfillment_webhooks_processed_total", "status" => "success")
                .increment(1);
            metrics::histogram!(
                "fulfillment_operation_duration_seconds",
                "operation" => "process_delivery"
            )
            .record(start.elapsed().as_secs_f64());

            match outcome {
                DeliveryOutcome::Fulfilled
                | DeliveryOutcome::AlreadyRecorded
                | DeliveryOutcome::Ignored => StatusCode::OK,
            }
        }
        Err(e) => {
            metrics::counter!("fulfillment_webhooks_processed_total", "status" => "error")
                .increment(1);

            match e {
                // Almost always a signing-secret misconfiguration; log it
                // loudly so it is caught before Stripe gives up retrying.
                FulfillmentError::InvalidSignature(_) => {
                    tracing::error!(error = %e, "Webhook signature rejected");
                    StatusCode::BAD_REQUEST
                }
                // Recoverable: a 4xx response makes Stripe redeliver later,
                // and the idempotent write makes that safe.
                FulfillmentError::MalformedEvent(_) | FulfillmentError::WriteFailed(_) => {
                    tracing::error!(error = %e, "Webhook processing failed");
                    StatusCode::BAD_REQUEST
                }
                FulfillmentError::Internal(_) => {
                    tracing::error!(error = %e, "Internal webhook error");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }
}
