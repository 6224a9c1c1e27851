//! HTTP request DTOs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One submitted ticket line
///
/// `price` 是终端在加菜时刻复制的目录价格快照，服务器原样持久化，
/// 不会用目录现价重算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketItemInput {
    pub dish_id: Option<i64>,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub custom_options: BTreeMap<String, Vec<String>>,
}

/// Full desired ticket state, submitted wholesale
///
/// ReplaceTicket 的请求体。没有增量项更新: 终端总是计算期望的
/// 完整项列表并整体提交 (delete-then-insert 语义)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub name: String,
    pub items: Vec<TicketItemInput>,
}

impl TicketDraft {
    /// Empty draft with the default name for a table
    pub fn empty(table_number: u32) -> Self {
        Self {
            name: crate::default_ticket_name(table_number),
            items: Vec::new(),
        }
    }
}
