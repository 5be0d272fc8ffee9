use crate::handlers::common::{success_response, validate_input};
use crate::{errors::ServiceError, ApiResponse, AppState};
use axum::{extract::State, response::Response, routing::post, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Router for the upload-collaborator callback
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/complete", post(upload_complete))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadCompleteRequest {
    #[validate(length(min = 1, message = "Configuration id is required"))]
    pub config_id: String,
    /// URL of the stored file
    #[validate(url(message = "fileUrl must be a valid URL"))]
    pub file_url: String,
    /// Pixel dimensions, sent with the source image upload only
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Upload-collaborator completion callback. The first stored file becomes
/// the configuration's source image; later uploads replace the crop.
#[utoipa::path(
    post,
    path = "/api/uploads/complete",
    request_body = UploadCompleteRequest,
    responses(
        (status = 200, description = "Configuration updated with the stored file"),
        (status = 400, description = "Malformed callback", body = crate::errors::ErrorResponse),
        (status = 404, description = "No phone case found", body = crate::errors::ErrorResponse)
    ),
    tag = "Uploads"
)]
pub async fn upload_complete(
    State(state): State<AppState>,
    Json(payload): Json<UploadCompleteRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let case = state
        .services
        .phone_cases
        .attach_upload(
            &payload.config_id,
            &payload.file_url,
            payload.width,
            payload.height,
        )
        .await?;

    Ok(success_response(ApiResponse::new(case)))
}
