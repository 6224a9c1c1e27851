//! Category Repository

use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE name = ?")
            .bind(&data.name)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.name
            )));
        }

        let id = sqlx::query("INSERT INTO categories (name, sort_order) VALUES (?, ?)")
            .bind(&data.name)
            .bind(data.sort_order.unwrap_or(0))
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create category".into()))
    }

    pub async fn update(&self, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

        sqlx::query("UPDATE categories SET name = ?, sort_order = ? WHERE id = ?")
            .bind(data.name.unwrap_or(current.name))
            .bind(data.sort_order.unwrap_or(current.sort_order))
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to reload category".into()))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let affected = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}
