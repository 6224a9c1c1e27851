//! Online Order Repository
//!
//! 订单创建与票据提交遵循同一条快照规则: 行项目价格在创建时刻从
//! 菜品目录复制，之后目录改价不影响历史订单。

use chrono::Utc;
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let mut orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        for order in &mut orders {
            order.items = self.find_items(order.id).await?;
        }
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match order {
            Some(mut order) => {
                order.items = self.find_items(order.id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    async fn find_items(&self, order_id: i64) -> RepoResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Create an order, snapshotting catalog prices in one transaction
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation("Order has no items".into()));
        }

        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query(
            "INSERT INTO orders (customer_name, customer_phone, status, created_at)
             VALUES (?, ?, 'pending', ?)",
        )
        .bind(&data.customer_name)
        .bind(&data.customer_phone)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for item in &data.items {
            if item.quantity == 0 {
                return Err(RepoError::Validation("Item quantity must be positive".into()));
            }
            // 目录价快照
            let price = sqlx::query_scalar::<_, f64>("SELECT price FROM dishes WHERE id = ?")
                .bind(item.dish_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    RepoError::Validation(format!("Dish {} does not exist", item.dish_id))
                })?;

            sqlx::query(
                "INSERT INTO order_items (order_id, dish_id, quantity, price)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.dish_id)
            .bind(item.quantity)
            .bind(price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create order".into()))
    }

    pub async fn update_status(&self, id: i64, status: OrderStatus) -> RepoResult<Order> {
        let affected = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(RepoError::NotFound(format!("Order {id} not found")));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to reload order".into()))
    }
}
