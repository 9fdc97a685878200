//! Request shapes and their structural checks.
//!
//! String fields are trimmed before the `validator` rules run, so lengths
//! are measured on the trimmed value. Anything that fails here, including a
//! body that does not deserialize, becomes a 422.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ApiError, ValidationErrorDetail};

/// Trims string fields in place before validation.
pub trait Normalize {
    fn normalize(&mut self);
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

/// Body of signup and login.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(length(min = 1, max = 30, message = "username must be 1 to 30 characters"))]
    #[schema(min_length = 1, max_length = 30, example = "alice")]
    pub username: String,
    #[validate(length(min = 1, max = 30, message = "password must be 1 to 30 characters"))]
    #[schema(min_length = 1, max_length = 30, example = "secret1")]
    pub password: String,
}

impl Normalize for Credentials {
    fn normalize(&mut self) {
        trim_in_place(&mut self.username);
        trim_in_place(&mut self.password);
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, max = 30, message = "oldPassword must be 1 to 30 characters"))]
    #[schema(min_length = 1, max_length = 30)]
    pub old_password: String,
    #[validate(length(min = 1, max = 30, message = "newPassword must be 1 to 30 characters"))]
    #[schema(min_length = 1, max_length = 30)]
    pub new_password: String,
}

impl Normalize for ResetPasswordRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.old_password);
        trim_in_place(&mut self.new_password);
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UploadImageRequest {
    #[validate(length(min = 1, max = 30, message = "title must be 1 to 30 characters"))]
    #[schema(min_length = 1, max_length = 30, example = "Sunset")]
    pub title: String,
    #[validate(url(message = "url must be a valid absolute URI"))]
    #[schema(format = Uri, example = "https://example.com/sunset.jpg")]
    pub url: String,
}

impl Normalize for UploadImageRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.url);
    }
}

/// `:imageId` path segment.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageIdPath {
    #[validate(length(equal = 24, message = "imageId must be 24 characters"))]
    pub image_id: String,
}

impl Normalize for ImageIdPath {
    fn normalize(&mut self) {
        trim_in_place(&mut self.image_id);
    }
}

/// JSON body that has been deserialized, trimmed and validated.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Normalize,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![ValidationErrorDetail {
                    field: "body".to_string(),
                    message: rejection.body_text(),
                }])
            })?;
        value.normalize();
        value.validate()?;
        Ok(Self(value))
    }
}

/// Path parameters that have been deserialized, trimmed and validated.
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Validate + Normalize + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(mut value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![ValidationErrorDetail {
                    field: "path".to_string(),
                    message: rejection.body_text(),
                }])
            })?;
        value.normalize();
        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(username: &str, password: &str) -> Credentials {
        let mut c = Credentials {
            username: username.into(),
            password: password.into(),
        };
        c.normalize();
        c
    }

    #[test]
    fn credentials_are_trimmed() {
        let c = creds("  alice ", "\tsecret1\n");
        assert_eq!(c.username, "alice");
        assert_eq!(c.password, "secret1");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn whitespace_only_username_is_rejected() {
        let errs = creds("   ", "secret1").validate().unwrap_err();
        assert!(errs.field_errors().contains_key("username"));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(creds(&"a".repeat(30), "p").validate().is_ok());
        assert!(creds(&"a".repeat(31), "p").validate().is_err());
        assert!(creds("a", &"p".repeat(31)).validate().is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(creds(&"é".repeat(30), "p").validate().is_ok());
    }

    #[test]
    fn reset_request_uses_camel_case_fields() {
        let mut req: ResetPasswordRequest =
            serde_json::from_str(r#"{"oldPassword":" old ","newPassword":"new"}"#).unwrap();
        req.normalize();
        assert_eq!(req.old_password, "old");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn upload_requires_absolute_url() {
        let mut ok = UploadImageRequest {
            title: " Sunset ".into(),
            url: " https://x.com/a.jpg ".into(),
        };
        ok.normalize();
        assert_eq!(ok.title, "Sunset");
        assert!(ok.validate().is_ok());

        let relative = UploadImageRequest {
            title: "Sunset".into(),
            url: "/a.jpg".into(),
        };
        let errs = relative.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("url"));
    }

    #[test]
    fn image_id_must_be_24_chars() {
        let good = ImageIdPath {
            image_id: "60d21b4667d0d8992e610c85".into(),
        };
        assert!(good.validate().is_ok());

        let short = ImageIdPath {
            image_id: "60d21b46".into(),
        };
        assert!(short.validate().is_err());
    }
}
