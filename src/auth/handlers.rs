use axum::{
    extract::State,
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{MessageResponse, PublicUser},
        extractors::BasicAuthUser,
        services,
    },
    error::{ApiResult, ErrorResponse},
    state::AppState,
    validation::{Credentials, ResetPasswordRequest, ValidatedJson},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/reset-password", patch(reset_password))
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Authentication",
    request_body = Credentials,
    responses(
        (status = 201, description = "Signup successful", body = PublicUser),
        (status = 400, description = "Username already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse),
    )
)]
#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<Credentials>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    let user = services::signup(state.users.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = PublicUser),
        (status = 400, description = "Invalid username or password", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse),
    )
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<Credentials>,
) -> ApiResult<Json<PublicUser>> {
    let user = services::login(state.users.as_ref(), payload).await?;
    Ok(Json(user))
}

/// Authentication is extracted before the body, so a bad body from an
/// unauthenticated caller is still a 401.
#[utoipa::path(
    patch,
    path = "/api/auth/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    security(("BasicAuth" = [])),
    responses(
        (status = 200, description = "Password updated successfully", body = MessageResponse),
        (status = 400, description = "Invalid old password", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    BasicAuthUser(user): BasicAuthUser,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    services::reset_password(
        state.users.as_ref(),
        &user,
        payload.old_password,
        payload.new_password,
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
