//! Daily Menu Repository

use chrono::{NaiveDate, Utc};
use shared::models::{DailyMenu, DailyMenuCreate, DailyMenuUpdate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct DailyMenuRepository {
    pool: SqlitePool,
}

impl DailyMenuRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<DailyMenu>> {
        let menus = sqlx::query_as::<_, DailyMenu>(
            "SELECT * FROM daily_menus ORDER BY active_from DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(menus)
    }

    /// Menus active today (public menu page)
    pub async fn find_active(&self) -> RepoResult<Vec<DailyMenu>> {
        self.find_active_on(Utc::now().date_naive()).await
    }

    pub async fn find_active_on(&self, date: NaiveDate) -> RepoResult<Vec<DailyMenu>> {
        let menus = sqlx::query_as::<_, DailyMenu>(
            "SELECT * FROM daily_menus WHERE active_from <= ? AND active_until >= ?
             ORDER BY name",
        )
        .bind(date)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(menus)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<DailyMenu>> {
        let menu = sqlx::query_as::<_, DailyMenu>("SELECT * FROM daily_menus WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(menu)
    }

    pub async fn create(&self, data: DailyMenuCreate) -> RepoResult<DailyMenu> {
        if data.active_until < data.active_from {
            return Err(RepoError::Validation(
                "active_until precedes active_from".into(),
            ));
        }

        let id = sqlx::query(
            "INSERT INTO daily_menus (name, price, courses, active_from, active_until)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.courses)
        .bind(data.active_from)
        .bind(data.active_until)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create daily menu".into()))
    }

    pub async fn update(&self, id: i64, data: DailyMenuUpdate) -> RepoResult<DailyMenu> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Daily menu {id} not found")))?;

        let active_from = data.active_from.unwrap_or(current.active_from);
        let active_until = data.active_until.unwrap_or(current.active_until);
        if active_until < active_from {
            return Err(RepoError::Validation(
                "active_until precedes active_from".into(),
            ));
        }

        sqlx::query(
            "UPDATE daily_menus SET name = ?, price = ?, courses = ?,
             active_from = ?, active_until = ? WHERE id = ?",
        )
        .bind(data.name.unwrap_or(current.name))
        .bind(data.price.unwrap_or(current.price))
        .bind(data.courses.unwrap_or(current.courses))
        .bind(active_from)
        .bind(active_until)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to reload daily menu".into()))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let affected = sqlx::query("DELETE FROM daily_menus WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}
