//! HTTP error taxonomy. Every handler returns `ApiResult<T>`; the error side
//! renders as `{"error": <code>, "message": <text>, "details"?: [...]}`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::auth::services::UserError;
use crate::images::services::ImageError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 422, structural problems with the input.
    #[error("validation failed: {} errors", .0.len())]
    Validation(Vec<ValidationErrorDetail>),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// 401. Deliberately carries no detail.
    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// 500. The source is logged, never sent to the client.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::Validation(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(details),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
                None,
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(err) => {
                error!(error = ?err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message,
            details,
        });
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(r#"Basic realm="images""#),
            );
        }
        response
    }
}

/// Request fields are camelCase on the wire; validator reports the Rust name.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                let field = wire_name(field);
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(details)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UsernameTaken(_)
            | UserError::InvalidCredentials
            | UserError::InvalidOldPassword => ApiError::BadRequest(err.to_string()),
            UserError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::Duplicate => ApiError::Conflict(err.to_string()),
            ImageError::NotFound => ApiError::NotFound(err.to_string()),
            ImageError::Forbidden => ApiError::Forbidden(err.to_string()),
            ImageError::Internal(e) => ApiError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn error_display() {
        let err = ApiError::NotFound("Image not found".to_string());
        assert_eq!(err.to_string(), "not found: Image not found");
        assert_eq!(ApiError::Unauthorized.to_string(), "unauthorized");
    }

    #[test]
    fn statuses_follow_taxonomy() {
        let cases = [
            (ApiError::Validation(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                ApiError::Internal(anyhow::anyhow!("db down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn unauthorized_sets_basic_challenge() {
        let response = ApiError::Unauthorized.into_response();
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert!(challenge.to_str().unwrap().starts_with("Basic"));
    }

    #[test]
    fn user_errors_map_to_bad_request() {
        let err: ApiError = UserError::UsernameTaken("alice".into()).into();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Username alice already exists"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn image_errors_map_to_distinct_statuses() {
        assert!(matches!(ApiError::from(ImageError::Forbidden), ApiError::Forbidden(_)));
        assert!(matches!(ApiError::from(ImageError::NotFound), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from(ImageError::Duplicate), ApiError::Conflict(_)));
    }

    #[derive(Validate)]
    struct TagForm {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(length(max = 2))]
        tag: String,
    }

    #[test]
    fn validation_errors_become_sorted_details() {
        let errs = TagForm {
            name: String::new(),
            tag: "long".into(),
        }
        .validate()
        .unwrap_err();
        match ApiError::from(errs) {
            ApiError::Validation(details) => {
                assert_eq!(
                    details,
                    vec![
                        ValidationErrorDetail {
                            field: "name".into(),
                            message: "name is required".into(),
                        },
                        ValidationErrorDetail {
                            field: "tag".into(),
                            message: "tag is invalid".into(),
                        },
                    ]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[derive(Validate)]
    struct SnakeFields {
        #[validate(length(min = 1))]
        new_password: String,
    }

    #[test]
    fn validation_details_use_wire_field_names() {
        let errs = SnakeFields {
            new_password: String::new(),
        }
        .validate()
        .unwrap_err();
        match ApiError::from(errs) {
            ApiError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "newPassword");
                assert_eq!(details[0].message, "newPassword is invalid");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wire_name_camel_cases_snake_fields() {
        assert_eq!(wire_name("image_id"), "imageId");
        assert_eq!(wire_name("old_password"), "oldPassword");
        assert_eq!(wire_name("url"), "url");
    }
}
