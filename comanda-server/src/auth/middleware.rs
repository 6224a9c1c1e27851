//! 认证中间件
//!
//! 为受保护的管理接口提供 JWT 认证。票据接口 (`/api/tickets/*`)、
//! 公共页面数据和登录接口不经过本中间件: 路由装配时只在管理
//! 子路由上挂载。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::debug!(uri = %req.uri(), "Missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    let claims = state.jwt().verify(token).map_err(|e| match e {
        crate::auth::JwtError::Expired => AppError::TokenExpired,
        other => AppError::invalid_token(other),
    })?;

    let user = CurrentUser {
        id: claims.sub.parse().map_err(|_| {
            AppError::invalid_token(format!("Non-numeric subject: {}", claims.sub))
        })?,
        username: claims.username,
    };
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
