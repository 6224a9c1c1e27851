//! Comanda Server - 餐厅网站与后台的 API 进程
//!
//! # 架构概述
//!
//! - **tickets** (`tickets`): 每桌打开票据的权威存储，事务化整体替换
//! - **rooms** (`rooms`): 按桌分房的实时广播 (socket.io 端点)
//! - **db** (`db`): SQLite + sqlx，嵌入式迁移
//! - **auth** (`auth`): JWT + Argon2 后台认证
//! - **api** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! comanda-server/src/
//! ├── core/       # 配置、状态、服务器生命周期
//! ├── auth/       # JWT 认证
//! ├── api/        # HTTP 路由和处理器
//! ├── db/         # 数据库层与 CRUD 仓储
//! ├── tickets/    # 票据存储 (POS 核心)
//! ├── rooms/      # 房间注册表 + socket.io 层 (POS 核心)
//! └── utils/      # 错误、日志
//! ```
//!
//! # POS 数据流
//!
//! ```text
//! 终端选桌 → joinMesa → GET /api/tickets/{n}
//! 本地编辑 → POST /api/tickets/{n} (完整期望状态)
//!     → TicketStore 事务化替换
//!     → 提交后 TableRooms::publish
//!     → 房间内所有终端收到 ticketUpdated
//!     → 各终端以服务器负载为准重渲染 (last-write-wins)
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod rooms;
pub mod tickets;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use rooms::{RoomSubscriber, TableRooms};
pub use tickets::{TicketError, TicketStore};
pub use utils::{AppError, AppResult, init_logger};
