//! Ticket Module
//!
//! "每桌当前打开票据" 的唯一权威来源。所有票据变更都经过
//! [`TicketStore`]，它保证:
//!
//! - 每桌同时最多一张 open 票据 (部分唯一索引 + 按桌串行化)
//! - ReplaceTicket 的 delete-then-insert 在单个事务内原子执行
//! - 关台幂等
//!
//! 数据流: 终端提交完整期望状态 → TicketStore 事务化持久
//! → 提交后 API 层向该桌房间广播水合快照 → 所有终端
//! (含提交者) 以服务器返回为准重渲染。

pub mod store;

pub use store::{TicketError, TicketStore};
