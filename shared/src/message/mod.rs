//! 实时通道消息类型
//!
//! 服务器和 POS 终端之间通过 socket.io 风格的命名事件通信。
//! 路由按桌号分房间，房间键为 `mesa-{n}`。
//!
//! # 事件
//!
//! | 方向 | 事件名 | 负载 |
//! |------|--------|------|
//! | 终端 → 服务器 | `joinMesa` | 桌号 |
//! | 终端 → 服务器 | `leaveMesa` | 桌号 |
//! | 终端 → 服务器 | `identify` | 终端显示名 |
//! | 服务器 → 房间 | `ticketUpdated` | 水合后的 [`TicketView`] |
//!
//! `ticketUpdated` 的负载永远是事务提交后的服务器端新读，不是客户端
//! 回显，因此并发提交的终端最终收敛到同一份服务器确认状态。

use serde::{Deserialize, Serialize};

use crate::models::TicketView;

/// Client → server event names
pub const EVENT_JOIN_MESA: &str = "joinMesa";
pub const EVENT_LEAVE_MESA: &str = "leaveMesa";
pub const EVENT_IDENTIFY: &str = "identify";

/// Server → room event name
pub const EVENT_TICKET_UPDATED: &str = "ticketUpdated";

/// Room key for a table number
pub fn room_key(table_number: u32) -> String {
    format!("mesa-{table_number}")
}

/// Server-originated event delivered to room members
///
/// 广播是尽力而为的: 错过的终端在下次 join 或本地提交时自愈。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum PosEvent {
    TicketUpdated(TicketView),
}

impl PosEvent {
    /// Wire event name for the socket layer
    pub fn event_name(&self) -> &'static str {
        match self {
            PosEvent::TicketUpdated(_) => EVENT_TICKET_UPDATED,
        }
    }

    /// Table this event belongs to
    pub fn table_number(&self) -> u32 {
        match self {
            PosEvent::TicketUpdated(view) => view.table_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_key_format() {
        assert_eq!(room_key(3), "mesa-3");
        assert_eq!(room_key(12), "mesa-12");
    }
}
