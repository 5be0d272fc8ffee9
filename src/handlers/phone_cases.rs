use crate::handlers::common::{created_response, success_response, validate_input};
use crate::{errors::ServiceError, ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for configuration endpoints
pub fn phone_case_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_phone_case))
        .route("/:id", get(get_phone_case).put(update_phone_case))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhoneCaseRequest {
    /// Client-minted opaque configuration id
    #[validate(length(min = 1, message = "Configuration id is required"))]
    pub config_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhoneCaseRequest {
    pub model_id: Uuid,
    pub material_id: Uuid,
    pub color_id: Uuid,
}

/// Allocate an empty configuration for a client-supplied id
#[utoipa::path(
    post,
    path = "/api/phone-cases",
    request_body = CreatePhoneCaseRequest,
    responses(
        (status = 201, description = "Configuration created"),
        (status = 400, description = "Missing configId", body = crate::errors::ErrorResponse),
        (status = 409, description = "Configuration already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Phone cases"
)]
pub async fn create_phone_case(
    State(state): State<AppState>,
    Json(payload): Json<CreatePhoneCaseRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let case = state
        .services
        .phone_cases
        .create(&payload.config_id)
        .await?;

    Ok(created_response(ApiResponse::new(case)))
}

/// Fetch a configuration with its catalog selections joined in
#[utoipa::path(
    get,
    path = "/api/phone-cases/{id}",
    params(("id" = String, Path, description = "Configuration id")),
    responses(
        (status = 200, description = "Denormalized configuration"),
        (status = 404, description = "No phone case found", body = crate::errors::ErrorResponse)
    ),
    tag = "Phone cases"
)]
pub async fn get_phone_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let detail = state.services.phone_cases.get(&id).await?;
    Ok(success_response(ApiResponse::new(detail)))
}

/// Apply model/material/color selections; total price is recomputed
/// server-side from the catalog rows
#[utoipa::path(
    put,
    path = "/api/phone-cases/{id}",
    params(("id" = String, Path, description = "Configuration id")),
    request_body = UpdatePhoneCaseRequest,
    responses(
        (status = 200, description = "Updated configuration with recomputed price"),
        (status = 400, description = "Unknown catalog id", body = crate::errors::ErrorResponse),
        (status = 404, description = "No phone case found", body = crate::errors::ErrorResponse)
    ),
    tag = "Phone cases"
)]
pub async fn update_phone_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePhoneCaseRequest>,
) -> Result<Response, ServiceError> {
    let updated = state
        .services
        .phone_cases
        .update_selections(&id, payload.model_id, payload.material_id, payload.color_id)
        .await?;

    Ok(success_response(ApiResponse::new(updated)))
}
