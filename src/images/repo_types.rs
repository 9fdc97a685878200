use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Image metadata. Only the URL is stored, never the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub title: String,
    #[schema(format = Uri)]
    pub url: String,
    pub author_id: String, // owning user's id
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Insert payload for `ImageStore::create_image`.
#[derive(Debug, Clone, Copy)]
pub struct NewImage<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub author_id: &'a str,
}
