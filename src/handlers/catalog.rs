use crate::handlers::common::success_response;
use crate::{errors::ServiceError, ApiResponse, AppState};
use axum::{extract::State, response::Response, routing::get, Router};

/// Creates the router for the read-only catalog endpoints
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/colors", get(list_colors))
        .route("/models", get(list_models))
        .route("/materials", get(list_materials))
}

/// List the available case colors
#[utoipa::path(
    get,
    path = "/api/colors",
    responses((status = 200, description = "All colors")),
    tag = "Catalog"
)]
pub async fn list_colors(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let colors = state.services.catalog.list_colors().await?;
    Ok(success_response(ApiResponse::new(colors)))
}

/// List the supported phone models
#[utoipa::path(
    get,
    path = "/api/models",
    responses((status = 200, description = "All models")),
    tag = "Catalog"
)]
pub async fn list_models(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let models = state.services.catalog.list_models().await?;
    Ok(success_response(ApiResponse::new(models)))
}

/// List the available case materials
#[utoipa::path(
    get,
    path = "/api/materials",
    responses((status = 200, description = "All materials")),
    tag = "Catalog"
)]
pub async fn list_materials(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let materials = state.services.catalog.list_materials().await?;
    Ok(success_response(ApiResponse::new(materials)))
}
