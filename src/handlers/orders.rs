use crate::handlers::common::{success_response, validate_input};
use crate::{
    auth::AuthenticatedUser, errors::ServiceError, ApiResponse, AppState, ListResponse,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    #[validate(length(min = 1, message = "Configuration id is required"))]
    pub config_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Provider-hosted redirect target for this purchase attempt
    pub url: String,
}

/// Open a hosted checkout session for a configuration
#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CreateCheckoutRequest,
    responses(
        (status = 200, description = "Redirect URL for the hosted checkout", body = CheckoutResponse),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown configuration", body = crate::errors::ErrorResponse),
        (status = 502, description = "Payment provider failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateCheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ServiceError> {
    validate_input(&payload)?;

    let url = state
        .services
        .checkout
        .create_checkout(&payload.config_id, &user)
        .await?;

    Ok(Json(CheckoutResponse { url }))
}

/// Look up an order by its checkout session id
#[utoipa::path(
    get,
    path = "/api/orders/by-session/{session_id}",
    params(("session_id" = String, Path, description = "Checkout session id")),
    responses(
        (status = 200, description = "Denormalized order"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order_by_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, ServiceError> {
    let detail = state.services.orders.get_by_session(&session_id).await?;
    Ok(success_response(ApiResponse::new(detail)))
}

/// List the signed-in user's orders, newest first
#[utoipa::path(
    get,
    path = "/api/orders/dashboard",
    responses(
        (status = 200, description = "Orders for the signed-in user"),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, ServiceError> {
    let orders = state.services.orders.list_for_user(user.id).await?;
    Ok(success_response(ListResponse {
        total: orders.len(),
        data: orders,
    }))
}
