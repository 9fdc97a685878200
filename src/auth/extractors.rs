use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::{repo_types::User, services::authenticate};
use crate::{error::ApiError, state::AppState};

/// The caller, authenticated from HTTP Basic credentials on this request.
pub struct BasicAuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for BasicAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match authenticate(state.users.as_ref(), header).await {
            Some(user) => Ok(BasicAuthUser(user)),
            None => {
                warn!(has_header = header.is_some(), "basic authentication failed");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
