//! Persistence collaborator: the store traits the services run against.

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::auth::repo_types::User;
use crate::images::repo_types::{Image, NewImage};

pub mod memory;

pub use memory::MemoryStore;

/// Length of every identifier handed out by a store.
pub const OBJECT_ID_LEN: usize = 24;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the insert. Carries the constraint name.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::Conflict(constraint);
            }
        }
        StoreError::Backend(anyhow::Error::new(err))
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `StoreError::Conflict` when the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn update_password_hash(&self, user_id: &str, password_hash: &str)
        -> Result<(), StoreError>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Insert an image. Fails with `StoreError::Conflict` on a duplicate title or url.
    async fn create_image(&self, new: NewImage<'_>) -> Result<Image, StoreError>;
    /// All images in insertion order.
    async fn list_images(&self) -> Result<Vec<Image>, StoreError>;
    async fn find_image_by_id(&self, id: &str) -> Result<Option<Image>, StoreError>;
    /// Returns `false` when nothing was deleted.
    async fn delete_image(&self, id: &str) -> Result<bool, StoreError>;
}

/// Postgres-backed store. The queries live next to their entity in
/// `auth::repo` and `images::repo`.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// 24 lowercase hex chars: 4 bytes of big-endian unix seconds, then 8 random bytes.
pub fn new_object_id() -> String {
    let secs = OffsetDateTime::now_utc().unix_timestamp() as u32;
    let tail: [u8; 8] = rand::random();
    secs.to_be_bytes()
        .iter()
        .chain(tail.iter())
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
