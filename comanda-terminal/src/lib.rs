//! Comanda Terminal - POS 终端会话库
//!
//! 每个终端围绕一张桌台运行一个 [`TerminalSession`] 状态机:
//! 选桌进房间、本地乐观编辑、整体提交并以服务器回读为准、
//! 采纳 `ticketUpdated` 广播覆盖本地陈旧状态。
//!
//! 状态机不做 I/O；[`Terminal`] 驱动器把转移效果执行到
//! [`TicketApi`] (HTTP) 和 [`RoomPort`] (实时通道) 上。

pub mod api;
pub mod error;
pub mod session;
pub mod terminal;

pub use api::{HttpTicketApi, NullRooms, RoomPort, TicketApi};
pub use error::{ApiError, ApiResult, TerminalError, TerminalResult};
pub use session::{SessionEffect, SessionState, TerminalSession};
pub use terminal::Terminal;
