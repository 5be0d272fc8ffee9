//! casecraft API Library
//!
//! This crate provides the core functionality for the casecraft storefront API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod payments;
pub mod services;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Success envelope for single-resource responses
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Success envelope for list responses
#[derive(Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
}

/// Builds the full application router. The checkout and dashboard routes
/// are wrapped with the session middleware; the webhook route is guarded
/// by signature verification instead of a session.
pub fn app_router(state: AppState) -> Router {
    let protected_orders = Router::new()
        .route("/checkout", post(handlers::orders::create_checkout))
        .route("/dashboard", get(handlers::orders::dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let orders = Router::new()
        .route(
            "/by-session/:session_id",
            get(handlers::orders::get_order_by_session),
        )
        .route(
            "/webhook",
            post(handlers::payment_webhooks::payment_webhook),
        )
        .merge(protected_orders);

    let api = Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/phone-cases", handlers::phone_cases::phone_case_routes())
        .merge(handlers::catalog::catalog_routes())
        .nest("/orders", orders)
        .nest("/uploads", handlers::uploads::upload_routes());

    Router::new()
        .route("/", get(|| async { "casecraft-api up" }))
        .nest("/api", api)
        .merge(openapi::swagger_ui())
        .with_state(state)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "casecraft-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::new(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::new(health_data)))
}
