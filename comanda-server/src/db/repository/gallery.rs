//! Gallery Repository

use shared::models::{GalleryImage, GalleryImageCreate, GalleryImageUpdate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct GalleryRepository {
    pool: SqlitePool,
}

impl GalleryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<GalleryImage>> {
        let images = sqlx::query_as::<_, GalleryImage>(
            "SELECT * FROM gallery_images ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<GalleryImage>> {
        let image =
            sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery_images WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(image)
    }

    pub async fn create(&self, data: GalleryImageCreate) -> RepoResult<GalleryImage> {
        let id = sqlx::query(
            "INSERT INTO gallery_images (title, image_path, sort_order) VALUES (?, ?, ?)",
        )
        .bind(&data.title)
        .bind(&data.image_path)
        .bind(data.sort_order.unwrap_or(0))
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create gallery image".into()))
    }

    pub async fn update(&self, id: i64, data: GalleryImageUpdate) -> RepoResult<GalleryImage> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Gallery image {id} not found")))?;

        sqlx::query(
            "UPDATE gallery_images SET title = ?, image_path = ?, sort_order = ? WHERE id = ?",
        )
        .bind(data.title.unwrap_or(current.title))
        .bind(data.image_path.unwrap_or(current.image_path))
        .bind(data.sort_order.unwrap_or(current.sort_order))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to reload gallery image".into()))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let affected = sqlx::query("DELETE FROM gallery_images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}
