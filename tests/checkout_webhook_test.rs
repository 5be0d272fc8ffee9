//! Integration tests for checkout initiation and webhook-driven order
//! finalization, including idempotent redelivery handling.

mod common;

use axum::http::{Method, StatusCode};
use casecraft_api::payments::{CustomerAddress, CustomerDetails, SessionDetails};
use common::{
    checkout_completed_event, response_json, sign_payload, TestApp, FAKE_CHECKOUT_URL,
};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

fn full_customer_session(session_id: &str) -> SessionDetails {
    SessionDetails {
        id: session_id.to_string(),
        customer_details: Some(CustomerDetails {
            name: Some("Iva Petrova".to_string()),
            phone: Some("+359888123456".to_string()),
            address: Some(CustomerAddress {
                line1: Some("1 Vitosha Blvd".to_string()),
                city: Some("Sofia".to_string()),
                postal_code: Some("1000".to_string()),
                country: Some("BG".to_string()),
            }),
        }),
    }
}

#[tokio::test]
async fn checkout_creates_hosted_session() {
    let app = TestApp::new().await;
    let (model_id, material_id, color_id) = app.seed_catalog(dec!(5.00), dec!(3.00)).await;
    app.seed_configured_case("cfg-1", model_id, material_id, color_id)
        .await;
    let user_id = app.seed_user("Iva", "iva@example.com", "sess_token_1").await;

    let response = app
        .request_with_token(
            Method::POST,
            "/api/orders/checkout",
            "sess_token_1",
            Some(json!({"configId": "cfg-1"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["url"], FAKE_CHECKOUT_URL);

    let checkouts = app.gateway.recorded_checkouts();
    assert_eq!(checkouts.len(), 1);
    let request = &checkouts[0];
    assert_eq!(request.amount_minor, 800);
    assert_eq!(request.currency, "usd");
    assert_eq!(request.metadata.phone_case_id, "cfg-1");
    assert_eq!(request.metadata.user_id, user_id);
    assert_eq!(request.allowed_countries, vec!["BG", "US"]);
    assert!(request
        .success_url
        .starts_with("http://localhost:3000/thank-you"));
    assert!(request
        .cancel_url
        .contains("/configure/preview?id=cfg-1"));
}

#[tokio::test]
async fn checkout_for_unknown_config_creates_no_session() {
    let app = TestApp::new().await;
    app.seed_user("Iva", "iva@example.com", "sess_token_1").await;

    let response = app
        .request_with_token(
            Method::POST,
            "/api/orders/checkout",
            "sess_token_1",
            Some(json!({"configId": "missing"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.gateway.recorded_checkouts().is_empty());
}

#[tokio::test]
async fn checkout_requires_session() {
    let app = TestApp::new().await;

    let no_token = app
        .request(
            Method::POST,
            "/api/orders/checkout",
            Some(json!({"configId": "cfg-1"})),
        )
        .await;
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let bad_token = app
        .request_with_token(
            Method::POST,
            "/api/orders/checkout",
            "nope",
            Some(json!({"configId": "cfg-1"})),
        )
        .await;
    assert_eq!(bad_token.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_rejects_invalid_signature_without_writes() {
    let app = TestApp::new().await;

    let payload = checkout_completed_event("sess-forged", None).to_string().into_bytes();

    let missing_header = app.webhook_raw(payload.clone(), None).await;
    assert_eq!(missing_header.status(), StatusCode::BAD_REQUEST);

    let wrong_secret = sign_payload(&payload, "whsec_wrong", chrono::Utc::now().timestamp());
    let forged = app.webhook_raw(payload, Some(wrong_secret)).await;
    assert_eq!(forged.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn webhook_finalizes_order_exactly_once() {
    let app = TestApp::new().await;
    let (model_id, material_id, color_id) = app.seed_catalog(dec!(5.00), dec!(3.00)).await;
    app.seed_configured_case("cfg-1", model_id, material_id, color_id)
        .await;
    let user_id = app.seed_user("Iva", "iva@example.com", "sess_token_1").await;
    app.gateway.stash_session(full_customer_session("sess-1"));

    let event = checkout_completed_event(
        "sess-1",
        Some(json!({"userId": user_id, "phoneCaseId": "cfg-1"})),
    );

    let first = app.webhook(&event).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = response_json(first).await;
    assert_eq!(first_body["received"], true);
    assert_eq!(app.order_count().await, 1);

    // Redelivery of the same event acknowledges without duplicating.
    let second = app.webhook(&event).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second_body = response_json(second).await;
    assert_eq!(second_body["message"], "Order already processed");
    assert_eq!(app.order_count().await, 1);

    // The denormalized order is readable by session id.
    let lookup = app
        .request(Method::GET, "/api/orders/by-session/sess-1", None)
        .await;
    assert_eq!(lookup.status(), StatusCode::OK);

    let body = response_json(lookup).await;
    let data = &body["data"];
    assert_eq!(data["price"], 800);
    assert_eq!(data["isPaid"], true);
    assert_eq!(data["status"], "pending");
    assert_eq!(data["stripeSessionId"], "sess-1");
    assert_eq!(data["phoneCase"]["id"], "cfg-1");
    assert_eq!(data["phoneCase"]["model"], "iPhone 15 Pro");
    assert_eq!(data["phoneCase"]["material"], "Leather");
    assert_eq!(data["phoneCase"]["color"]["hex"], "#B9C69B");
    assert_eq!(data["shippingAddress"]["name"], "Iva Petrova");
    assert_eq!(data["shippingAddress"]["city"], "Sofia");
    assert_eq!(data["billingAddress"]["street"], "1 Vitosha Blvd");
}

#[tokio::test]
async fn webhook_without_metadata_is_acknowledged_without_order() {
    let app = TestApp::new().await;

    let no_metadata = checkout_completed_event("sess-empty", None);
    let response = app.webhook(&no_metadata).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["received"], true);

    let partial = checkout_completed_event("sess-partial", Some(json!({"userId": Uuid::new_v4()})));
    let response = app.webhook(&partial).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn webhook_for_missing_config_is_acknowledged_without_order() {
    let app = TestApp::new().await;
    let user_id = app.seed_user("Iva", "iva@example.com", "sess_token_1").await;

    let event = checkout_completed_event(
        "sess-gone",
        Some(json!({"userId": user_id, "phoneCaseId": "deleted-cfg"})),
    );
    let response = app.webhook(&event).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["received"], true);
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn webhook_substitutes_placeholders_for_missing_address_fields() {
    let app = TestApp::new().await;
    let (model_id, material_id, color_id) = app.seed_catalog(dec!(5.00), dec!(3.00)).await;
    app.seed_configured_case("cfg-sparse", model_id, material_id, color_id)
        .await;
    let user_id = app.seed_user("Iva", "iva@example.com", "sess_token_1").await;

    app.gateway.stash_session(SessionDetails {
        id: "sess-sparse".to_string(),
        customer_details: Some(CustomerDetails {
            name: None,
            phone: None,
            address: Some(CustomerAddress {
                line1: None,
                city: Some("Sofia".to_string()),
                postal_code: None,
                country: None,
            }),
        }),
    });

    let event = checkout_completed_event(
        "sess-sparse",
        Some(json!({"userId": user_id, "phoneCaseId": "cfg-sparse"})),
    );
    let response = app.webhook(&event).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.order_count().await, 1);

    let lookup = app
        .request(Method::GET, "/api/orders/by-session/sess-sparse", None)
        .await;
    let body = response_json(lookup).await;
    let shipping = &body["data"]["shippingAddress"];
    assert_eq!(shipping["name"], "Unknown Customer");
    assert_eq!(shipping["street"], "Unknown");
    assert_eq!(shipping["city"], "Sofia");
    assert_eq!(shipping["postalCode"], "Unknown");
    assert_eq!(shipping["country"], "Unknown");
    assert_eq!(shipping["phoneNumber"], "");
}

#[tokio::test]
async fn webhook_ignores_other_event_types() {
    let app = TestApp::new().await;

    let event = json!({
        "id": "evt_other",
        "type": "payment_intent.created",
        "data": {"object": {"id": "pi_1"}}
    });
    let response = app.webhook(&event).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["received"], true);
    assert_eq!(body["event_type"], "payment_intent.created");
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn webhook_acknowledges_even_when_session_lookup_fails() {
    let app = TestApp::new().await;
    let (model_id, material_id, color_id) = app.seed_catalog(dec!(5.00), dec!(3.00)).await;
    app.seed_configured_case("cfg-err", model_id, material_id, color_id)
        .await;
    let user_id = app.seed_user("Iva", "iva@example.com", "sess_token_1").await;

    // No session stashed in the gateway: retrieval fails downstream.
    let event = checkout_completed_event(
        "sess-unknown",
        Some(json!({"userId": user_id, "phoneCaseId": "cfg-err"})),
    );
    let response = app.webhook(&event).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["received"], true);
    assert!(body["error"].is_string());
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn order_lookup_for_unknown_session_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/orders/by-session/never-seen", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_lists_only_the_callers_orders() {
    let app = TestApp::new().await;
    let (model_id, material_id, color_id) = app.seed_catalog(dec!(5.00), dec!(3.00)).await;

    let iva = app.seed_user("Iva", "iva@example.com", "token_iva").await;
    let rado = app.seed_user("Rado", "rado@example.com", "token_rado").await;

    for (config_id, session_id, user_id) in [
        ("cfg-iva", "sess-iva", iva),
        ("cfg-rado", "sess-rado", rado),
    ] {
        app.seed_configured_case(config_id, model_id, material_id, color_id)
            .await;
        app.gateway.stash_session(full_customer_session(session_id));
        let event = checkout_completed_event(
            session_id,
            Some(json!({"userId": user_id, "phoneCaseId": config_id})),
        );
        let response = app.webhook(&event).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(app.order_count().await, 2);

    let dashboard = app
        .request_with_token(Method::GET, "/api/orders/dashboard", "token_iva", None)
        .await;
    assert_eq!(dashboard.status(), StatusCode::OK);

    let body = response_json(dashboard).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["stripeSessionId"], "sess-iva");
    assert_eq!(body["data"][0]["phoneCase"]["id"], "cfg-iva");

    let unauthenticated = app
        .request(Method::GET, "/api/orders/dashboard", None)
        .await;
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);
}
