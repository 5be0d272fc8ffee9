#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::Value;
use sha2::Sha256;
use tower::ServiceExt;
use uuid::Uuid;

use casecraft_api::{
    app_router,
    config::AppConfig,
    db,
    entities::{color, material, model, order, session, user},
    errors::ServiceError,
    handlers::AppServices,
    payments::{
        CheckoutRequest, HostedCheckout, PaymentGateway, SessionDetails,
    },
    services::checkout::CheckoutSettings,
    AppState,
};

pub const WEBHOOK_SECRET: &str = "whsec_test123secret456";
pub const FAKE_CHECKOUT_URL: &str = "https://checkout.stripe.test/pay/cs_test_fake";

type HmacSha256 = Hmac<Sha256>;

/// In-process stand-in for the payment provider. Records checkout
/// requests and serves stashed session details by id.
#[derive(Default)]
pub struct FakeGateway {
    pub checkouts: Mutex<Vec<CheckoutRequest>>,
    pub sessions: Mutex<HashMap<String, SessionDetails>>,
}

impl FakeGateway {
    pub fn stash_session(&self, details: SessionDetails) {
        self.sessions
            .lock()
            .unwrap()
            .insert(details.id.clone(), details);
    }

    pub fn recorded_checkouts(&self) -> Vec<CheckoutRequest> {
        self.checkouts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<HostedCheckout, ServiceError> {
        self.checkouts.lock().unwrap().push(request);
        Ok(HostedCheckout {
            session_id: "cs_test_fake".to_string(),
            url: FAKE_CHECKOUT_URL.to_string(),
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails, ServiceError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                ServiceError::PaymentGateway(format!("unknown session {}", session_id))
            })
    }
}

/// Test harness: application router backed by a fresh in-memory SQLite
/// database and the fake payment gateway.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub gateway: Arc<FakeGateway>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:",
            "127.0.0.1",
            0,
            "test",
            "sk_test_key",
            WEBHOOK_SECRET,
        );
        // A single connection keeps the in-memory database alive for the
        // lifetime of the test.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let gateway = Arc::new(FakeGateway::default());
        let services = AppServices::new(
            db_arc.clone(),
            gateway.clone() as Arc<dyn PaymentGateway>,
            CheckoutSettings::from_config(&cfg),
        );

        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
        };
        let router = app_router(state.clone());

        Self {
            router,
            state,
            gateway,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_inner(method, uri, None, body).await
    }

    pub async fn request_with_token(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> Response {
        self.request_inner(method, uri, Some(token), body).await
    }

    async fn request_inner(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request should not fail at the transport level")
    }

    /// Posts a correctly signed webhook event.
    pub async fn webhook(&self, payload: &Value) -> Response {
        let bytes = payload.to_string().into_bytes();
        let signature = sign_payload(&bytes, WEBHOOK_SECRET, Utc::now().timestamp());
        self.webhook_raw(bytes, Some(signature)).await
    }

    pub async fn webhook_raw(&self, body: Vec<u8>, signature: Option<String>) -> Response {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/orders/webhook")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(signature) = signature {
            builder = builder.header("stripe-signature", signature);
        }

        self.router
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .expect("webhook request should not fail at the transport level")
    }

    /// Inserts a user plus an unexpired session and returns the user id.
    pub async fn seed_user(&self, name: &str, email: &str, token: &str) -> Uuid {
        let now = Utc::now();
        let user_id = Uuid::new_v4();

        user::ActiveModel {
            id: Set(user_id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            email_verified: Set(true),
            image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed user");

        session::ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(token.to_string()),
            user_id: Set(user_id),
            expires_at: Set(now + Duration::hours(1)),
            ip_address: Set(None),
            user_agent: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed session");

        user_id
    }

    /// Seeds one model/material/color triple and returns their ids.
    pub async fn seed_catalog(
        &self,
        model_price: Decimal,
        material_price: Decimal,
    ) -> (Uuid, Uuid, Uuid) {
        let now = Utc::now();
        let model_id = Uuid::new_v4();
        let material_id = Uuid::new_v4();
        let color_id = Uuid::new_v4();

        model::ActiveModel {
            id: Set(model_id),
            name: Set("iPhone 15 Pro".to_string()),
            year: Set(2023),
            price: Set(model_price),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed model");

        material::ActiveModel {
            id: Set(material_id),
            name: Set("Leather".to_string()),
            description: Set("Premium look, durable".to_string()),
            price: Set(material_price),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed material");

        color::ActiveModel {
            id: Set(color_id),
            name: Set("Sage".to_string()),
            hex: Set("#B9C69B".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed color");

        (model_id, material_id, color_id)
    }

    /// Creates a configuration through the API and applies selections.
    pub async fn seed_configured_case(
        &self,
        config_id: &str,
        model_id: Uuid,
        material_id: Uuid,
        color_id: Uuid,
    ) {
        let created = self
            .request(
                Method::POST,
                "/api/phone-cases",
                Some(serde_json::json!({"configId": config_id})),
            )
            .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let updated = self
            .request(
                Method::PUT,
                &format!("/api/phone-cases/{}", config_id),
                Some(serde_json::json!({
                    "modelId": model_id,
                    "materialId": material_id,
                    "colorId": color_id,
                })),
            )
            .await;
        assert_eq!(updated.status(), StatusCode::OK);
    }

    pub async fn order_count(&self) -> u64 {
        order::Entity::find()
            .count(&*self.state.db)
            .await
            .expect("count orders")
    }
}

/// Computes the provider signature header for a payload.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(format!("{}.", timestamp).as_bytes());
    mac.update(payload);
    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    )
}

pub async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// A completed-checkout event as delivered by the provider.
pub fn checkout_completed_event(session_id: &str, metadata: Option<Value>) -> Value {
    let mut object = serde_json::json!({"id": session_id});
    if let Some(metadata) = metadata {
        object["metadata"] = metadata;
    }
    serde_json::json!({
        "id": format!("evt_{}", session_id),
        "type": "checkout.session.completed",
        "data": {"object": object}
    })
}
