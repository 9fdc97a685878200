//! OpenAPI description of the HTTP surface, generated from the handler
//! annotations and served with Swagger UI at `/api-docs`.

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{
    self,
    dto::{MessageResponse, PublicUser},
};
use crate::error::{ErrorResponse, ValidationErrorDetail};
use crate::images::{self, repo_types::Image};
use crate::state::AppState;
use crate::validation::{Credentials, ResetPasswordRequest, UploadImageRequest};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "T-Image Upload API",
        description = "API documentation for Timage Service"
    ),
    paths(
        auth::handlers::signup,
        auth::handlers::login,
        auth::handlers::reset_password,
        images::handlers::list_images,
        images::handlers::upload_image,
        images::handlers::get_image,
        images::handlers::delete_image,
    ),
    components(schemas(
        Credentials,
        ResetPasswordRequest,
        UploadImageRequest,
        PublicUser,
        MessageResponse,
        Image,
        ErrorResponse,
        ValidationErrorDetail,
    )),
    modifiers(&BasicAuthScheme),
    tags(
        (name = "Authentication", description = "Signup, login and password reset"),
        (name = "Images", description = "Image metadata sharing"),
    )
)]
pub struct ApiDoc;

struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "BasicAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

pub fn router() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn doc() -> Value {
        serde_json::to_value(ApiDoc::openapi()).unwrap()
    }

    #[test]
    fn documents_every_route() {
        let doc = doc();
        let paths = doc["paths"].as_object().unwrap();
        for (path, method) in [
            ("/api/auth/signup", "post"),
            ("/api/auth/login", "post"),
            ("/api/auth/reset-password", "patch"),
            ("/api/images", "get"),
            ("/api/images", "post"),
            ("/api/images/{imageId}", "get"),
            ("/api/images/{imageId}", "delete"),
        ] {
            assert!(paths[path][method].is_object(), "missing {method} {path}");
        }
        assert!(doc["paths"]["/api/images/{imageId}"]["delete"]["responses"]["403"].is_object());
    }

    #[test]
    fn basic_auth_scheme_is_registered() {
        let doc = doc();
        assert_eq!(doc["components"]["securitySchemes"]["BasicAuth"]["scheme"], "basic");
        let security = &doc["paths"]["/api/images"]["post"]["security"][0];
        assert!(security["BasicAuth"].is_array());
        assert!(doc["paths"]["/api/images"]["get"]["security"].is_null());
    }

    #[test]
    fn schemas_use_wire_field_names() {
        let doc = doc();
        let schemas = &doc["components"]["schemas"];
        let reset = &schemas["ResetPasswordRequest"]["properties"];
        assert!(reset["oldPassword"].is_object());
        assert!(reset["newPassword"].is_object());
        let image = &schemas["Image"]["properties"];
        for field in ["id", "title", "url", "authorId", "createdAt", "updatedAt"] {
            assert!(image[field].is_object(), "Image.{field} missing");
        }
        assert_eq!(schemas["Credentials"]["properties"]["username"]["maxLength"], 30);
    }
}
