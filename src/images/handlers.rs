use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use super::{repo_types::Image, services};
use crate::{
    auth::extractors::BasicAuthUser,
    error::{ApiResult, ErrorResponse},
    state::AppState,
    validation::{ImageIdPath, UploadImageRequest, ValidatedJson, ValidatedPath},
};

pub fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/images", get(list_images).post(upload_image))
        .route("/images/:imageId", get(get_image).delete(delete_image))
}

#[utoipa::path(
    post,
    path = "/api/images",
    tag = "Images",
    request_body = UploadImageRequest,
    security(("BasicAuth" = [])),
    responses(
        (status = 201, description = "Image uploaded", body = Image),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 409, description = "Duplicate title or url", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    BasicAuthUser(user): BasicAuthUser,
    ValidatedJson(payload): ValidatedJson<UploadImageRequest>,
) -> ApiResult<(StatusCode, Json<Image>)> {
    let image = services::upload(state.images.as_ref(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/api/images",
    tag = "Images",
    responses(
        (status = 200, description = "All images, oldest first", body = Vec<Image>),
        (status = 500, description = "Server error", body = ErrorResponse),
    )
)]
#[instrument(skip(state))]
pub async fn list_images(State(state): State<AppState>) -> ApiResult<Json<Vec<Image>>> {
    let images = services::list_all(state.images.as_ref()).await?;
    Ok(Json(images))
}

#[utoipa::path(
    get,
    path = "/api/images/{imageId}",
    tag = "Images",
    params(("imageId" = String, Path, description = "24-character image id")),
    responses(
        (status = 200, description = "The requested image", body = Image),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse),
    )
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    ValidatedPath(path): ValidatedPath<ImageIdPath>,
) -> ApiResult<Json<Image>> {
    let image = services::get_by_id(state.images.as_ref(), &path.image_id).await?;
    Ok(Json(image))
}

/// Only the author may delete an image.
#[utoipa::path(
    delete,
    path = "/api/images/{imageId}",
    tag = "Images",
    params(("imageId" = String, Path, description = "24-character image id")),
    security(("BasicAuth" = [])),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller is not the author", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn delete_image(
    State(state): State<AppState>,
    BasicAuthUser(user): BasicAuthUser,
    ValidatedPath(path): ValidatedPath<ImageIdPath>,
) -> ApiResult<StatusCode> {
    services::delete_by_id(state.images.as_ref(), &user, &path.image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
