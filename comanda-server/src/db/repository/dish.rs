//! Dish Repository

use shared::models::{Dish, DishCreate, DishUpdate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct DishRepository {
    pool: SqlitePool,
}

impl DishRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find all dishes, available first, then by name
    pub async fn find_all(&self) -> RepoResult<Vec<Dish>> {
        let dishes = sqlx::query_as::<_, Dish>(
            "SELECT * FROM dishes ORDER BY is_available DESC, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(dishes)
    }

    /// Find all dishes in a category
    pub async fn find_by_category(&self, category_id: i64) -> RepoResult<Vec<Dish>> {
        let dishes = sqlx::query_as::<_, Dish>(
            "SELECT * FROM dishes WHERE category_id = ? ORDER BY name",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(dishes)
    }

    /// Find dish by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>("SELECT * FROM dishes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(dish)
    }

    /// Create a new dish
    pub async fn create(&self, data: DishCreate) -> RepoResult<Dish> {
        if data.price < 0.0 {
            return Err(RepoError::Validation("Price must not be negative".into()));
        }

        let id = sqlx::query(
            "INSERT INTO dishes (name, description, price, category_id, image_path, is_available)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.category_id)
        .bind(&data.image_path)
        .bind(data.is_available.unwrap_or(true))
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create dish".into()))
    }

    /// Update a dish
    pub async fn update(&self, id: i64, data: DishUpdate) -> RepoResult<Dish> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))?;

        if let Some(price) = data.price
            && price < 0.0
        {
            return Err(RepoError::Validation("Price must not be negative".into()));
        }

        sqlx::query(
            "UPDATE dishes SET name = ?, description = ?, price = ?, category_id = ?,
             image_path = ?, is_available = ? WHERE id = ?",
        )
        .bind(data.name.unwrap_or(current.name))
        .bind(data.description.unwrap_or(current.description))
        .bind(data.price.unwrap_or(current.price))
        .bind(data.category_id.unwrap_or(current.category_id))
        .bind(data.image_path.unwrap_or(current.image_path))
        .bind(data.is_available.unwrap_or(current.is_available))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to reload dish".into()))
    }

    /// Delete a dish
    ///
    /// 历史票据项通过 `ON DELETE SET NULL` 保留价格快照。
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let affected = sqlx::query("DELETE FROM dishes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> DishRepository {
        let db = DbService::in_memory().await.expect("db");
        DishRepository::new(db.pool)
    }

    async fn seed_category(repo: &DishRepository) -> i64 {
        sqlx::query("INSERT INTO categories (name, sort_order) VALUES ('Entrantes', 1)")
            .execute(&repo.pool)
            .await
            .expect("category")
            .last_insert_rowid()
    }

    async fn seed_dish(repo: &DishRepository, category_id: Option<i64>) -> Dish {
        repo.create(DishCreate {
            name: "Tortilla".into(),
            description: String::new(),
            price: 8.5,
            category_id,
            image_path: Some("img/tortilla.jpg".into()),
            is_available: None,
        })
        .await
        .expect("dish")
    }

    #[tokio::test]
    async fn update_with_explicit_null_clears_category_and_image() {
        let repo = repo().await;
        let category_id = seed_category(&repo).await;
        let dish = seed_dish(&repo, Some(category_id)).await;

        // 线上负载: 字段出现且为 null 表示清空
        let payload: DishUpdate =
            serde_json::from_str(r#"{"category_id": null, "image_path": null}"#).expect("payload");
        assert_eq!(payload.category_id, Some(None));
        assert_eq!(payload.image_path, Some(None));

        let updated = repo.update(dish.id, payload).await.expect("update");
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.image_path, None);
        assert_eq!(updated.name, "Tortilla");
    }

    #[tokio::test]
    async fn update_keeps_omitted_nullable_fields() {
        let repo = repo().await;
        let category_id = seed_category(&repo).await;
        let dish = seed_dish(&repo, Some(category_id)).await;

        let payload: DishUpdate = serde_json::from_str(r#"{"price": 9.0}"#).expect("payload");
        assert_eq!(payload.category_id, None);

        let updated = repo.update(dish.id, payload).await.expect("update");
        assert_eq!(updated.price, 9.0);
        assert_eq!(updated.category_id, Some(category_id));
        assert_eq!(updated.image_path.as_deref(), Some("img/tortilla.jpg"));
    }
}
