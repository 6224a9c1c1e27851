//! Terminal client error types

use thiserror::Error;

/// Error from the ticket API or the room transport
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server-side failure
    #[error("Server error: {0}")]
    Server(String),

    /// Real-time transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Error surfaced to the terminal user
///
/// 提交失败时本地未保存状态保持不变，用户可手动重试。
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for terminal operations
pub type TerminalResult<T> = Result<T, TerminalError>;
