//! Comanda Shared - 服务器和 POS 终端共享的类型
//!
//! 该 crate 不包含任何业务逻辑，只定义：
//!
//! - **models**: 持久化领域模型 (Ticket, Dish, Category, ...)
//! - **message**: 实时通道的事件类型和房间命名
//! - **request / response**: HTTP API 的 DTO
//!
//! `db` feature 为模型启用 `sqlx::FromRow` / `sqlx::Type` 派生，
//! 仅服务器端需要。

pub mod message;
pub mod models;
pub mod request;
pub mod response;

pub use message::{PosEvent, room_key};
pub use models::{
    Category, DailyMenu, Dish, GalleryImage, Order, OrderItem, OrderStatus, Reservation,
    ReservationStatus, Ticket, TicketItemView, TicketStatus, TicketView, User,
};
pub use request::{TicketDraft, TicketItemInput};
pub use response::CloseTicketResponse;

/// 默认票据名称: "Ticket Mesa {n}"
pub fn default_ticket_name(table_number: u32) -> String {
    format!("Ticket Mesa {table_number}")
}
