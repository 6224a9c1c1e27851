//! Auth API Handlers

use axum::{Extension, Json, extract::State};
use shared::models::{LoginRequest, LoginResponse};

use crate::auth::{CurrentUser, verify_password};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// POST /api/auth/login
///
/// 用户名不存在与密码错误返回同一个错误，避免用户名枚举。
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.pool());
    let user = repo.find_by_username(&payload.username).await?;

    let valid = user
        .as_ref()
        .map(|user| verify_password(&payload.password, &user.password_hash))
        .unwrap_or(false);

    let Some(user) = user.filter(|_| valid) else {
        tracing::info!(username = %payload.username, "Failed login attempt");
        return Err(AppError::unauthorized());
    };

    let token = state
        .jwt()
        .generate(user.id, &user.username)
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        username: user.username,
    }))
}

/// GET /api/auth/me
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "id": user.id,
        "username": user.username,
    }))
}
