use async_trait::async_trait;

use crate::images::repo_types::{Image, NewImage};
use crate::store::{new_object_id, ImageStore, PgStore, StoreError};

#[async_trait]
impl ImageStore for PgStore {
    async fn create_image(&self, new: NewImage<'_>) -> Result<Image, StoreError> {
        let image = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO images (id, title, url, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, url, author_id, created_at, updated_at
            "#,
        )
        .bind(new_object_id())
        .bind(new.title)
        .bind(new.url)
        .bind(new.author_id)
        .fetch_one(&self.db)
        .await?;
        Ok(image)
    }

    async fn list_images(&self) -> Result<Vec<Image>, StoreError> {
        let rows = sqlx::query_as::<_, Image>(
            r#"
            SELECT id, title, url, author_id, created_at, updated_at
              FROM images
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_image_by_id(&self, id: &str) -> Result<Option<Image>, StoreError> {
        let row = sqlx::query_as::<_, Image>(
            r#"
            SELECT id, title, url, author_id, created_at, updated_at
              FROM images
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_image(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
