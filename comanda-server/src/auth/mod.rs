//! 认证模块: JWT + Argon2
//!
//! 管理后台接口走 `Authorization: Bearer <token>`；票据接口和公共
//! 页面数据接口不需要认证。

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};

/// 通过认证的当前用户，由中间件注入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}
