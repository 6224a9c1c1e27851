//! Ticket Store
//!
//! ReplaceTicket 是该层唯一的变更入口: 没有增量项更新。调用方
//! (终端会话) 总是计算期望的完整项列表并整体提交。

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use shared::models::{Ticket, TicketItemView, TicketView};
use shared::request::TicketDraft;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tokio::sync::Mutex;

/// Ticket operation errors
#[derive(Debug, Error)]
pub enum TicketError {
    /// 持久化失败，携带底层原因。调用方不自动重试。
    #[error("Ticket operation failed: {0}")]
    Operation(String),

    #[error("Invalid ticket submission: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for TicketError {
    fn from(err: sqlx::Error) -> Self {
        TicketError::Operation(err.to_string())
    }
}

type TicketResult<T> = Result<T, TicketError>;

/// Authoritative per-table open-ticket store
///
/// 终端只持有读取派生的快照；一桌的并发 replace 通过该桌的异步锁
/// 串行化 (SQLite 的单写者之外再显式保证同桌不交错)。
#[derive(Clone)]
pub struct TicketStore {
    pool: SqlitePool,
    table_locks: Arc<DashMap<u32, Arc<Mutex<()>>>>,
}

impl TicketStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            table_locks: Arc::new(DashMap::new()),
        }
    }

    fn table_lock(&self, table_number: u32) -> Arc<Mutex<()>> {
        self.table_locks
            .entry(table_number)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Current open ticket for a table, hydrated, or None
    ///
    /// 没有打开的票据是正常状态，不是错误。
    pub async fn get_open_ticket(&self, table_number: u32) -> TicketResult<Option<TicketView>> {
        let header = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE table_number = ? AND status = 'open'",
        )
        .bind(table_number)
        .fetch_optional(&self.pool)
        .await?;

        match header {
            Some(ticket) => {
                let items = fetch_items(&self.pool, ticket.id).await?;
                Ok(Some(hydrate(ticket, items)))
            }
            None => Ok(None),
        }
    }

    /// Replace the full state of a table's open ticket
    ///
    /// 单个事务内: 找到或创建 open 票头 → 更新名称 → 删除全部旧项
    /// → 插入提交的项列表。价格与定制负载按提交原样写入，绝不从
    /// 目录重算。返回水合后的票据 (join 当前菜品显示数据)。
    pub async fn replace_ticket(
        &self,
        table_number: u32,
        draft: &TicketDraft,
    ) -> TicketResult<TicketView> {
        self.replace_ticket_then(table_number, draft, |_| {}).await
    }

    /// Replace, then run `after_commit` before the per-table lock is
    /// released
    ///
    /// 广播走这里而不是在返回之后: 回调持有该桌的锁，同一桌的发布
    /// 顺序因此与事务提交顺序一致，订阅者不会被后发先至的旧快照
    /// 覆盖。回调拿到的就是已提交的水合状态。
    pub async fn replace_ticket_then<F>(
        &self,
        table_number: u32,
        draft: &TicketDraft,
        after_commit: F,
    ) -> TicketResult<TicketView>
    where
        F: FnOnce(&TicketView),
    {
        for item in &draft.items {
            if item.quantity == 0 {
                return Err(TicketError::Validation(
                    "Item quantity must be positive".into(),
                ));
            }
        }

        let lock = self.table_lock(table_number);
        let _guard = lock.lock().await;

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE table_number = ? AND status = 'open'",
        )
        .bind(table_number)
        .fetch_optional(&mut *tx)
        .await?;

        let ticket_id = match existing {
            Some(ticket) => {
                sqlx::query("UPDATE tickets SET name = ? WHERE id = ?")
                    .bind(&draft.name)
                    .bind(ticket.id)
                    .execute(&mut *tx)
                    .await?;
                ticket.id
            }
            None => sqlx::query(
                "INSERT INTO tickets (table_number, name, status, created_at)
                 VALUES (?, ?, 'open', ?)",
            )
            .bind(table_number)
            .bind(&draft.name)
            .bind(chrono::Utc::now())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid(),
        };

        // Replace-by-delete-then-insert, never diffed
        sqlx::query("DELETE FROM ticket_items WHERE ticket_id = ?")
            .bind(ticket_id)
            .execute(&mut *tx)
            .await?;

        for item in &draft.items {
            let custom_options = serde_json::to_string(&item.custom_options)
                .map_err(|e| TicketError::Operation(e.to_string()))?;
            sqlx::query(
                "INSERT INTO ticket_items (ticket_id, dish_id, quantity, price, custom_options)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(ticket_id)
            .bind(item.dish_id)
            .bind(item.quantity)
            .bind(item.price)
            .bind(custom_options)
            .execute(&mut *tx)
            .await?;
        }

        // Hydrate inside the transaction so the returned snapshot is
        // exactly the committed state
        let header = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = ?")
            .bind(ticket_id)
            .fetch_one(&mut *tx)
            .await?;
        let items = fetch_items(&mut *tx, ticket_id).await?;

        tx.commit().await?;

        tracing::debug!(
            table = table_number,
            ticket_id,
            items = items.len(),
            "Ticket replaced"
        );

        let view = hydrate(header, items);
        after_commit(&view);
        Ok(view)
    }

    /// Close the table's open ticket; no-op when none is open
    ///
    /// 多个终端可能竞相关台，因此关台幂等。
    pub async fn close_ticket(&self, table_number: u32) -> TicketResult<()> {
        let lock = self.table_lock(table_number);
        let _guard = lock.lock().await;

        let affected = sqlx::query(
            "UPDATE tickets SET status = 'closed' WHERE table_number = ? AND status = 'open'",
        )
        .bind(table_number)
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::debug!(table = table_number, closed = affected > 0, "Ticket close");
        Ok(())
    }
}

/// Items joined with live dish display data
async fn fetch_items<'e, E>(executor: E, ticket_id: i64) -> TicketResult<Vec<TicketItemView>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let rows = sqlx::query(
        "SELECT ti.id, ti.dish_id, d.name AS dish_name, ti.quantity, ti.price, ti.custom_options
         FROM ticket_items ti
         LEFT JOIN dishes d ON d.id = ti.dish_id
         WHERE ti.ticket_id = ?
         ORDER BY ti.id",
    )
    .bind(ticket_id)
    .fetch_all(executor)
    .await?;

    rows.into_iter()
        .map(|row| {
            let raw_options: String = row.try_get("custom_options")?;
            let custom_options: BTreeMap<String, Vec<String>> =
                serde_json::from_str(&raw_options).unwrap_or_default();
            Ok(TicketItemView {
                id: row.try_get("id")?,
                dish_id: row.try_get("dish_id")?,
                dish_name: row.try_get("dish_name")?,
                quantity: row.try_get("quantity")?,
                price: row.try_get("price")?,
                custom_options,
            })
        })
        .collect()
}

fn hydrate(header: Ticket, items: Vec<TicketItemView>) -> TicketView {
    TicketView {
        id: header.id,
        table_number: header.table_number,
        name: header.name,
        status: header.status,
        created_at: header.created_at,
        items,
    }
}

impl std::fmt::Debug for TicketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketStore").finish_non_exhaustive()
    }
}
