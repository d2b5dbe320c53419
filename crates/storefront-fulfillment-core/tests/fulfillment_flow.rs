//! End-to-end pipeline tests against the in-memory store
//!
//! Exercises verify -> classify -> write with real signatures, including
//! the redelivery and concurrency guarantees of the idempotent write.

use std::sync::Arc;

use chrono::Utc;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;

use storefront_db::MemoryOrderStore;
use storefront_fulfillment_core::{DeliveryOutcome, FulfillmentError, FulfillmentService, WebhookVerifier};

const SECRET: &str = "whsec_test_secret";

/// Generate a valid signature header for a payload
fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

fn checkout_payload(session_id: &str, email: &str, amount_total: i64) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": format!("evt_{session_id}"),
        "type": "checkout.session.completed",
        "created": Utc::now().timestamp(),
        "data": {
            "object": {
                "id": session_id,
                "amount_total": amount_total,
                "total_details": { "amount_shipping": 499 },
                "metadata": {
                    "email": email,
                    "images": "[\"https://img.example.com/1.jpg\"]"
                }
            }
        }
    }))
    .unwrap()
}

fn other_event_payload(event_type: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": "evt_other",
        "type": event_type,
        "created": Utc::now().timestamp(),
        "data": { "object": { "id": "obj_123" } }
    }))
    .unwrap()
}

fn service(store: &MemoryOrderStore) -> FulfillmentService {
    FulfillmentService::new(WebhookVerifier::new(SECRET), Arc::new(store.clone()))
}

#[tokio::test]
async fn checkout_event_records_order() {
    let store = MemoryOrderStore::new();
    let service = service(&store);

    let payload = checkout_payload("cs_1", "buyer@example.com", 2599);
    let sig = sign(&payload, SECRET, Utc::now().timestamp());

    let outcome = service.process_delivery(&payload, &sig).await.unwrap();
    assert_eq!(outcome, DeliveryOutcome::Fulfilled);

    let row = store.get("buyer@example.com", "cs_1").unwrap();
    assert_eq!(row.amount, Decimal::new(2599, 2));
    assert_eq!(row.amount_shipping, Decimal::new(499, 2));
    assert_eq!(row.images, vec!["https://img.example.com/1.jpg".to_string()]);
}

#[tokio::test]
async fn redelivery_writes_exactly_once() {
    let store = MemoryOrderStore::new();
    let service = service(&store);

    let payload = checkout_payload("cs_1", "buyer@example.com", 2599);

    for attempt in 0..5 {
        let sig = sign(&payload, SECRET, Utc::now().timestamp());
        let outcome = service.process_delivery(&payload, &sig).await.unwrap();
        if attempt == 0 {
            assert_eq!(outcome, DeliveryOutcome::Fulfilled);
        } else {
            assert_eq!(outcome, DeliveryOutcome::AlreadyRecorded);
        }
    }

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn concurrent_redelivery_yields_one_record() {
    let store = MemoryOrderStore::new();
    let service = service(&store);

    let payload = checkout_payload("cs_race", "buyer@example.com", 2599);
    let sig_a = sign(&payload, SECRET, Utc::now().timestamp());
    let sig_b = sign(&payload, SECRET, Utc::now().timestamp());

    let (a, b) = tokio::join!(
        service.process_delivery(&payload, &sig_a),
        service.process_delivery(&payload, &sig_b),
    );

    // Both deliveries succeed; exactly one logical record survives
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(store.len(), 1);

    let outcomes = [a.unwrap(), b.unwrap()];
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == DeliveryOutcome::Fulfilled)
            .count(),
        1
    );
}

#[tokio::test]
async fn distinct_sessions_each_get_a_record() {
    let store = MemoryOrderStore::new();
    let service = service(&store);

    for session_id in ["cs_1", "cs_2", "cs_3"] {
        let payload = checkout_payload(session_id, "buyer@example.com", 1000);
        let sig = sign(&payload, SECRET, Utc::now().timestamp());
        service.process_delivery(&payload, &sig).await.unwrap();
    }

    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn ignored_event_performs_no_write() {
    let store = MemoryOrderStore::new();
    let service = service(&store);

    for event_type in ["invoice.paid", "customer.subscription.updated"] {
        let payload = other_event_payload(event_type);
        let sig = sign(&payload, SECRET, Utc::now().timestamp());

        let outcome = service.process_delivery(&payload, &sig).await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Ignored);
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn invalid_signature_performs_no_write() {
    let store = MemoryOrderStore::new();
    let service = service(&store);

    let payload = checkout_payload("cs_1", "buyer@example.com", 2599);
    let sig = sign(&payload, "whsec_wrong_secret", Utc::now().timestamp());

    let err = service.process_delivery(&payload, &sig).await.unwrap_err();
    assert!(matches!(err, FulfillmentError::InvalidSignature(_)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn malformed_checkout_event_performs_no_write() {
    let store = MemoryOrderStore::new();
    let service = service(&store);

    // Checkout event missing the customer identifier
    let payload = serde_json::to_vec(&serde_json::json!({
        "id": "evt_bad",
        "type": "checkout.session.completed",
        "created": Utc::now().timestamp(),
        "data": {
            "object": {
                "id": "cs_bad",
                "amount_total": 2599,
                "total_details": { "amount_shipping": 499 },
                "metadata": { "images": "[]" }
            }
        }
    }))
    .unwrap();
    let sig = sign(&payload, SECRET, Utc::now().timestamp());

    let err = service.process_delivery(&payload, &sig).await.unwrap_err();
    assert!(matches!(err, FulfillmentError::MalformedEvent(_)));
    assert!(store.is_empty());
}
