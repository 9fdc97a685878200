use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{new_object_id, ImageStore, StoreError, UserStore};
use crate::auth::repo_types::User;
use crate::images::repo_types::{Image, NewImage};

/// In-process store used by the test suite and by local runs without
/// `DATABASE_URL`. Uniqueness checks happen under the write lock so they
/// are atomic with the insert, like the database constraints.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    images: RwLock<Vec<Image>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError::Conflict("users_username_key".into()));
        }
        let user = User {
            id: new_object_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| anyhow::anyhow!("user {} not found", user_id))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn create_image(&self, new: NewImage<'_>) -> Result<Image, StoreError> {
        let mut images = self.images.write().await;
        if images.iter().any(|i| i.title == new.title) {
            return Err(StoreError::Conflict("images_title_key".into()));
        }
        if images.iter().any(|i| i.url == new.url) {
            return Err(StoreError::Conflict("images_url_key".into()));
        }
        let now = OffsetDateTime::now_utc();
        let image = Image {
            id: new_object_id(),
            title: new.title.to_string(),
            url: new.url.to_string(),
            author_id: new.author_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        images.push(image.clone());
        Ok(image)
    }

    async fn list_images(&self) -> Result<Vec<Image>, StoreError> {
        Ok(self.images.read().await.clone())
    }

    async fn find_image_by_id(&self, id: &str) -> Result<Option<Image>, StoreError> {
        let images = self.images.read().await;
        Ok(images.iter().find(|i| i.id == id).cloned())
    }

    async fn delete_image(&self, id: &str) -> Result<bool, StoreError> {
        let mut images = self.images.write().await;
        let before = images.len();
        images.retain(|i| i.id != id);
        Ok(images.len() != before)
    }
}
