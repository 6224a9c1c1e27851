//! Data models
//!
//! Shared between comanda-server and the POS terminals (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod daily_menu;
pub mod dish;
pub mod gallery;
pub mod order;
pub mod reservation;
pub mod ticket;
pub mod user;

// Re-exports
pub use category::*;
pub use daily_menu::*;
pub use dish::*;
pub use gallery::*;
pub use order::*;
pub use reservation::*;
pub use ticket::*;
pub use user::*;
