//! Ticket Model
//!
//! 桌台的 "当前打开票据"。不变量: 每个桌号同时最多一张 open 票据，
//! 由 `tickets` 表上的部分唯一索引保证。

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
}

/// Ticket header row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ticket {
    pub id: i64,
    pub table_number: u32,
    pub name: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Hydrated ticket item as rendered by terminals
///
/// `dish_name` 来自当前菜品目录 (join)，可能为 None (菜品已删除)。
/// `price` 是提交时刻的快照，永远不从目录重新计算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketItemView {
    pub id: i64,
    pub dish_id: Option<i64>,
    pub dish_name: Option<String>,
    pub quantity: u32,
    pub price: f64,
    /// Grouped customization selections (e.g. "punto" -> ["poco hecho"])
    #[serde(default)]
    pub custom_options: BTreeMap<String, Vec<String>>,
}

/// Fully hydrated ticket: header + items joined with dish display data
///
/// 这是 GetOpenTicket / ReplaceTicket 的返回形状，也是
/// `ticketUpdated` 广播的负载。终端只持有该快照，从不持有活引用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketView {
    pub id: i64,
    pub table_number: u32,
    pub name: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<TicketItemView>,
}

impl TicketView {
    /// Ticket total, computed through Decimal to avoid float accumulation
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| {
                Decimal::from_f64(item.price).unwrap_or_default() * Decimal::from(item.quantity)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: u32) -> TicketItemView {
        TicketItemView {
            id: 0,
            dish_id: None,
            dish_name: None,
            quantity,
            price,
            custom_options: BTreeMap::new(),
        }
    }

    #[test]
    fn total_is_exact_over_float_prices() {
        let view = TicketView {
            id: 1,
            table_number: 3,
            name: "Ticket Mesa 3".into(),
            status: TicketStatus::Open,
            created_at: Utc::now(),
            items: vec![item(0.1, 3), item(10.55, 2)],
        };
        assert_eq!(view.total(), Decimal::new(2140, 2)); // 0.30 + 21.10
    }
}
