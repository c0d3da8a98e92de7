//! API integration tests
//!
//! These run against a live server with a seeded database: a 30-minute
//! service (id 1, price 10000, 50% deposit), an employee (id 1) working
//! Mondays 09:00-10:00, a client (id 1), and an unrestricted 20% promotion
//! code SPRING20 valid on the test date.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

// A Monday
const DATE: &str = "2025-06-02";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_available_slots() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/availability/slots?service_id=1&date={}",
            BASE_URL, DATE
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let slots: Value = response.json().await.expect("Failed to parse response");
    let slots = slots.as_array().expect("Expected a slot array");
    // 09:00-10:00 at 30 minutes -> exactly two slots
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["start_time"], "09:00:00");
    assert_eq!(slots[1]["start_time"], "09:30:00");
    for slot in slots {
        assert_eq!(slot["status"], "available");
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_service_yields_empty_not_error() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/availability/slots?service_id=9999&date={}",
            BASE_URL, DATE
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let slots: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(slots.as_array().expect("array").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_malformed_date_is_a_validation_error() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/availability/slots?service_id=1&date=junk",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_book_and_cancel() {
    let client = Client::new();

    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .json(&json!({
            "service_id": 1,
            "client_id": 1,
            "employee_id": 1,
            "date": DATE,
            "start_time": "09:00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let appointment: Value = response.json().await.expect("Failed to parse response");
    let id = appointment["id"].as_i64().expect("No appointment ID");
    // price 10000 at 50% deposit
    assert_eq!(appointment["status"], "pending_deposit");
    assert_eq!(appointment["deposit_amount"], "5000");

    // The slot is gone from availability
    let response = client
        .get(format!(
            "{}/availability/slots?service_id=1&date={}",
            BASE_URL, DATE
        ))
        .send()
        .await
        .expect("Failed to send request");
    let slots: Value = response.json().await.expect("Failed to parse response");
    assert!(slots
        .as_array()
        .expect("array")
        .iter()
        .all(|s| s["start_time"] != "09:00:00"));

    // Cleanup: cancel releases the slot
    let response = client
        .post(format!("{}/appointments/{}/cancel", BASE_URL, id))
        .json(&json!({"reason": "integration test"}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let cancelled: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(cancelled["status"], "cancelled");
}

#[tokio::test]
#[ignore]
async fn test_double_booking_conflict() {
    let client = Client::new();
    let body = json!({
        "service_id": 1,
        "client_id": 1,
        "employee_id": 1,
        "date": DATE,
        "start_time": "09:30"
    });

    // Fire both requests concurrently; exactly one may win the slot
    let (a, b) = tokio::join!(
        client.post(format!("{}/appointments", BASE_URL)).json(&body).send(),
        client.post(format!("{}/appointments", BASE_URL)).json(&body).send(),
    );
    let a = a.expect("Failed to send request");
    let b = b.expect("Failed to send request");

    let statuses = [a.status().as_u16(), b.status().as_u16()];
    assert!(statuses.contains(&201), "one booking must succeed: {:?}", statuses);
    assert!(statuses.contains(&409), "one booking must conflict: {:?}", statuses);

    // Cleanup
    for response in [a, b] {
        if response.status() == 201 {
            let appointment: Value = response.json().await.expect("parse");
            let id = appointment["id"].as_i64().expect("id");
            let _ = client
                .post(format!("{}/appointments/{}/cancel", BASE_URL, id))
                .json(&json!({"reason": "integration test"}))
                .send()
                .await;
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_payment_webhook_confirms_and_is_idempotent() {
    let client = Client::new();

    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .json(&json!({
            "service_id": 1,
            "client_id": 1,
            "employee_id": 1,
            "date": DATE,
            "start_time": "09:00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let appointment: Value = response.json().await.expect("parse");
    let id = appointment["id"].as_i64().expect("id");

    let webhook = json!({
        "appointment_id": id,
        "payment_reference": "pay_test_001",
        "outcome": "succeeded"
    });

    let response = client
        .post(format!("{}/payments/webhook", BASE_URL))
        .json(&webhook)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let confirmed: Value = response.json().await.expect("parse");
    assert_eq!(confirmed["status"], "confirmed");
    assert_eq!(confirmed["deposit_paid"], true);

    // Replay is a no-op, not an error
    let response = client
        .post(format!("{}/payments/webhook", BASE_URL))
        .json(&webhook)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let replayed: Value = response.json().await.expect("parse");
    assert_eq!(replayed["status"], "confirmed");

    // Cleanup
    let _ = client
        .post(format!("{}/appointments/{}/cancel", BASE_URL, id))
        .json(&json!({"reason": "integration test"}))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_third_reschedule_is_refused() {
    let client = Client::new();

    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .json(&json!({
            "service_id": 1,
            "client_id": 1,
            "employee_id": 1,
            "date": DATE,
            "start_time": "09:00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let appointment: Value = response.json().await.expect("parse");
    let id = appointment["id"].as_i64().expect("id");

    // Bounce between the two slots of the day: two reschedules succeed
    for start in ["09:30", "09:00"] {
        let response = client
            .post(format!("{}/appointments/{}/reschedule", BASE_URL, id))
            .json(&json!({"date": DATE, "start_time": start}))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success(), "reschedule to {}", start);
    }

    // The third is refused
    let response = client
        .post(format!("{}/appointments/{}/reschedule", BASE_URL, id))
        .json(&json!({"date": DATE, "start_time": "09:30"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Cleanup
    let _ = client
        .post(format!("{}/appointments/{}/cancel", BASE_URL, id))
        .json(&json!({"reason": "integration test"}))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_promotion_quote() {
    let client = Client::new();

    let response = client
        .post(format!("{}/promotions/validate", BASE_URL))
        .json(&json!({
            "code": "SPRING20",
            "service_id": 1,
            "date": DATE,
            "amount": 20000
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let quote: Value = response.json().await.expect("parse");
    assert_eq!(quote["applicable"], true);
    assert_eq!(quote["discount"], "4000");
    assert_eq!(quote["final_amount"], "16000");
}
