//! Daily Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DailyMenu, DailyMenuCreate, DailyMenuUpdate};

use crate::core::ServerState;
use crate::db::repository::DailyMenuRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/menus - 全部菜单 (管理后台)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DailyMenu>>> {
    let repo = DailyMenuRepository::new(state.pool());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/menus/active - 今日生效菜单 (公开菜单页)
pub async fn list_active(State(state): State<ServerState>) -> AppResult<Json<Vec<DailyMenu>>> {
    let repo = DailyMenuRepository::new(state.pool());
    Ok(Json(repo.find_active().await?))
}

/// GET /api/menus/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DailyMenu>> {
    let repo = DailyMenuRepository::new(state.pool());
    let menu = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Daily menu {id} not found")))?;
    Ok(Json(menu))
}

/// POST /api/menus
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DailyMenuCreate>,
) -> AppResult<Json<DailyMenu>> {
    let repo = DailyMenuRepository::new(state.pool());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/menus/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DailyMenuUpdate>,
) -> AppResult<Json<DailyMenu>> {
    let repo = DailyMenuRepository::new(state.pool());
    Ok(Json(repo.update(id, payload).await?))
}

/// DELETE /api/menus/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = DailyMenuRepository::new(state.pool());
    Ok(Json(repo.delete(id).await?))
}
