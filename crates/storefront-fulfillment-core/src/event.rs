//! Event classification and checkout session decoding

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FulfillmentError;
use crate::webhook::{EventType, VerifiedEvent};

/// The fulfillment-relevant subset of a checkout-completed event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Session ID (stable, unique per checkout attempt)
    pub session_id: String,
    /// Customer ID (the buyer's email, carried in event metadata)
    pub customer_id: String,
    /// Total amount in major currency units
    pub amount: Decimal,
    /// Shipping amount in major currency units
    pub amount_shipping: Decimal,
    /// Product image URLs for the purchased items
    pub images: Vec<String>,
}

/// Where a verified event goes next
#[derive(Debug, Clone)]
pub enum Disposition {
    /// Checkout completed; hand off to the fulfillment writer
    Fulfillable(CheckoutSession),
    /// Event type this system does not act on; acknowledge and drop
    Ignored,
}

/// Route a verified event by its declared type.
///
/// Only `checkout.session.completed` is fulfillable. A fulfillable event
/// whose body cannot be decoded fails with
/// [`FulfillmentError::MalformedEvent`] rather than being dropped, since a
/// silent drop would lose a paid order.
pub fn classify(event: &VerifiedEvent) -> Result<Disposition, FulfillmentError> {
    match event.event_type {
        EventType::CheckoutSessionCompleted => Ok(Disposition::Fulfillable(
            CheckoutSession::from_object(&event.object)?,
        )),
        EventType::Other(_) => Ok(Disposition::Ignored),
    }
}

/// Convert integer minor currency units to decimal major units
/// (2599 -> 25.99)
pub fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

impl CheckoutSession {
    /// Decode a checkout session from an event's `data.object` payload
    fn from_object(object: &serde_json::Value) -> Result<Self, FulfillmentError> {
        let raw: RawCheckoutSession = serde_json::from_value(object.clone())
            .map_err(|e| FulfillmentError::MalformedEvent(e.to_string()))?;

        // The item image list arrives JSON-serialized inside metadata
        let images: Vec<String> = serde_json::from_str(&raw.metadata.images)
            .map_err(|e| FulfillmentError::MalformedEvent(format!("metadata.images: {e}")))?;

        Ok(Self {
            session_id: raw.id,
            customer_id: raw.metadata.email,
            amount: minor_to_major(raw.amount_total),
            amount_shipping: minor_to_major(raw.total_details.amount_shipping),
            images,
        })
    }
}

// Raw wire shapes for parsing
#[derive(Debug, Deserialize)]
struct RawCheckoutSession {
    id: String,
    amount_total: i64,
    total_details: RawTotalDetails,
    metadata: RawMetadata,
}

#[derive(Debug, Deserialize)]
struct RawTotalDetails {
    amount_shipping: i64,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    email: String,
    images: String,
}
