//! Real-Time Room Module
//!
//! 把已连接的 POS 终端按桌号分进房间，并把 ticketUpdated 事件推给
//! 正在看该桌的每个终端。
//!
//! # 架构
//!
//! ```text
//! ReplaceTicket 提交成功
//!        │
//!        ▼
//! TableRooms::publish("mesa-{n}", snapshot)   ◄── 每次提交恰好一次，
//!        │                                        且在事务提交之后
//!        ▼ (fire-and-forget)
//! 房间内每个连接的 mpsc 通道
//!        │
//!        ▼
//! socket 层逐连接转发为 `ticketUpdated` 事件
//! ```
//!
//! 房间成员关系纯内存、每进程一份，进程重启后由终端重新 join 重建。
//! 多进程部署时每个进程只覆盖自己的连接，没有跨进程扇出，这是
//! 已知的扩展上限而不是待解决的问题。

pub mod socket;
pub mod table_rooms;

pub use socket::mount_socket_layer;
pub use table_rooms::{RoomSubscriber, TableRooms};
