//! Stripe webhook signature verification and decoding

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{error, warn};

use crate::error::FulfillmentError;

/// Default signature timestamp tolerance, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Webhook event types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    /// Checkout session completed
    CheckoutSessionCompleted,
    /// Any other event type; acknowledged and dropped
    Other(String),
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            other => Self::Other(other.to_string()),
        }
    }
}

impl EventType {
    /// The wire-format tag for this event type
    pub fn as_str(&self) -> &str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::Other(s) => s,
        }
    }
}

/// Verified webhook event
///
/// Only constructed via [`WebhookVerifier::verify_and_decode`]; holding
/// one means the payload came from the processor and was not tampered
/// with in transit. It carries no further trust than that.
#[derive(Debug, Clone)]
pub struct VerifiedEvent {
    /// Event ID
    pub id: String,
    /// Event type
    pub event_type: EventType,
    /// When the event was created (Unix timestamp)
    pub created: i64,
    /// The event's `data.object` payload
    pub object: serde_json::Value,
}

/// Verifies and decodes raw webhook deliveries
///
/// Verification runs over the exact raw bytes of the request body; any
/// transcoding before this point would invalidate the signature.
#[derive(Clone)]
pub struct WebhookVerifier {
    signing_secret: String,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    /// Create a verifier with the default timestamp tolerance
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Override the timestamp tolerance
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Verify a raw delivery and decode it into a [`VerifiedEvent`]
    pub fn verify_and_decode(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<VerifiedEvent, FulfillmentError> {
        self.verify_signature(payload, signature)?;

        let raw: RawEvent = serde_json::from_slice(payload)
            .map_err(|e| FulfillmentError::MalformedEvent(e.to_string()))?;

        Ok(VerifiedEvent {
            id: raw.id,
            event_type: EventType::from(raw.event_type.as_str()),
            created: raw.created,
            object: raw.data.object,
        })
    }

    /// Verify the `Stripe-Signature` header against the raw payload
    fn verify_signature(&self, payload: &[u8], signature: &str) -> Result<(), FulfillmentError> {
        // Parse signature header: t=timestamp,v1=signature
        let mut timestamp: Option<&str> = None;
        let mut sig_v1: Option<&str> = None;

        for part in signature.split(',') {
            if let Some((key, value)) = part.split_once('=') {
                match key {
                    "t" => timestamp = Some(value),
                    "v1" => sig_v1 = Some(value),
                    _ => {}
                }
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            warn!("Missing timestamp in webhook signature");
            FulfillmentError::InvalidSignature("missing timestamp".to_string())
        })?;

        let sig_v1 = sig_v1.ok_or_else(|| {
            warn!("Missing v1 signature in webhook signature");
            FulfillmentError::InvalidSignature("missing signature".to_string())
        })?;

        // MAC over "{timestamp}.{raw body}" without transcoding the body
        let mut mac = Hmac::<Sha256>::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|_| FulfillmentError::Internal("HMAC key setup".to_string()))?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = hex::encode(mac.finalize().into_bytes());

        // Compare signatures (constant-time)
        if !constant_time_eq(sig_v1.as_bytes(), expected.as_bytes()) {
            error!("Webhook signature verification failed");
            return Err(FulfillmentError::InvalidSignature(
                "signature mismatch".to_string(),
            ));
        }

        // Check timestamp freshness to bound the replay window
        let ts: i64 = timestamp.parse().map_err(|_| {
            FulfillmentError::InvalidSignature("invalid timestamp format".to_string())
        })?;
        let now = Utc::now().timestamp();
        if (now - ts).abs() > self.tolerance_secs {
            warn!(timestamp = ts, now = now, "Webhook timestamp outside tolerance");
            return Err(FulfillmentError::InvalidSignature(
                "timestamp outside tolerance".to_string(),
            ));
        }

        Ok(())
    }
}

/// Constant-time comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0, |acc, (x, y)| acc | (x ^ y)) == 0
}

// Raw event shape for parsing
#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: RawEventData,
    created: i64,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    object: serde_json::Value,
}
