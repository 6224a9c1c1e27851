//! Repository Module
//!
//! Per-entity CRUD over the SQLite pool. The ticket tables are NOT
//! accessed through a repository here; all ticket mutation goes through
//! [`crate::tickets::TicketStore`], which owns the transactional
//! replace/close semantics.

pub mod category;
pub mod daily_menu;
pub mod dish;
pub mod gallery;
pub mod order;
pub mod reservation;
pub mod user;

// Re-exports
pub use category::CategoryRepository;
pub use daily_menu::DailyMenuRepository;
pub use dish::DishRepository;
pub use gallery::GalleryRepository;
pub use order::OrderRepository;
pub use reservation::ReservationRepository;
pub use user::UserRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
