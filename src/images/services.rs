use tracing::{info, warn};

use super::repo_types::{Image, NewImage};
use crate::auth::repo_types::User;
use crate::store::{ImageStore, StoreError};
use crate::validation::UploadImageRequest;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Image with this title or url already exists")]
    Duplicate,
    #[error("Image not found")]
    NotFound,
    #[error("Forbidden from deleting")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ImageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ImageError::Duplicate,
            StoreError::Backend(e) => ImageError::Internal(e),
        }
    }
}

/// Stores a new image owned by `owner`.
pub async fn upload(
    images: &dyn ImageStore,
    owner: &User,
    req: UploadImageRequest,
) -> Result<Image, ImageError> {
    let new = NewImage {
        title: &req.title,
        url: &req.url,
        author_id: &owner.id,
    };
    let image = images.create_image(new).await.map_err(|e| {
        if let StoreError::Conflict(constraint) = &e {
            warn!(user_id = %owner.id, %constraint, "duplicate image");
        }
        ImageError::from(e)
    })?;

    info!(image_id = %image.id, user_id = %owner.id, "image uploaded");
    Ok(image)
}

pub async fn list_all(images: &dyn ImageStore) -> Result<Vec<Image>, ImageError> {
    Ok(images.list_images().await?)
}

pub async fn get_by_id(images: &dyn ImageStore, id: &str) -> Result<Image, ImageError> {
    images
        .find_image_by_id(id)
        .await?
        .ok_or(ImageError::NotFound)
}

/// Deletes the image if `caller` owns it.
pub async fn delete_by_id(
    images: &dyn ImageStore,
    caller: &User,
    id: &str,
) -> Result<(), ImageError> {
    let image = get_by_id(images, id).await?;
    if image.author_id != caller.id {
        warn!(image_id = %id, user_id = %caller.id, "delete attempt by non-owner");
        return Err(ImageError::Forbidden);
    }

    // Gone between the lookup and the delete.
    if !images.delete_image(id).await? {
        return Err(ImageError::NotFound);
    }

    info!(image_id = %id, user_id = %caller.id, "image deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UserStore};

    async fn user(store: &MemoryStore, name: &str) -> User {
        store.create_user(name, "not-a-real-hash").await.unwrap()
    }

    fn upload_req(title: &str, url: &str) -> UploadImageRequest {
        UploadImageRequest {
            title: title.into(),
            url: url.into(),
        }
    }

    #[tokio::test]
    async fn upload_sets_owner() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let image = upload(&store, &alice, upload_req("Sunset", "https://x.com/a.jpg"))
            .await
            .unwrap();
        assert_eq!(image.author_id, alice.id);
        assert_eq!(image.title, "Sunset");
        assert_eq!(get_by_id(&store, &image.id).await.unwrap(), image);
    }

    #[tokio::test]
    async fn duplicate_upload_is_rejected() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        upload(&store, &alice, upload_req("Sunset", "https://x.com/a.jpg"))
            .await
            .unwrap();
        let err = upload(&store, &alice, upload_req("Sunset", "https://x.com/b.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImageError::Duplicate));
        assert_eq!(list_all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = get_by_id(&store, "60d21b4667d0d8992e610c85").await.unwrap_err();
        assert!(matches!(err, ImageError::NotFound));
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let image = upload(&store, &alice, upload_req("Sunset", "https://x.com/a.jpg"))
            .await
            .unwrap();

        let err = delete_by_id(&store, &bob, &image.id).await.unwrap_err();
        assert!(matches!(err, ImageError::Forbidden));
        assert!(get_by_id(&store, &image.id).await.is_ok());
    }

    #[tokio::test]
    async fn owner_delete_removes_image() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let image = upload(&store, &alice, upload_req("Sunset", "https://x.com/a.jpg"))
            .await
            .unwrap();

        delete_by_id(&store, &alice, &image.id).await.unwrap();
        assert!(matches!(
            get_by_id(&store, &image.id).await.unwrap_err(),
            ImageError::NotFound
        ));
        assert!(matches!(
            delete_by_id(&store, &alice, &image.id).await.unwrap_err(),
            ImageError::NotFound
        ));
    }
}
