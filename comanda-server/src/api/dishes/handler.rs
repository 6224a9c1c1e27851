//! Dish API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Dish, DishCreate, DishUpdate};

use crate::core::ServerState;
use crate::db::repository::DishRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category_id: Option<i64>,
}

/// GET /api/dishes - 获取全部菜品 (可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Dish>>> {
    let repo = DishRepository::new(state.pool());
    let dishes = match params.category_id {
        Some(category_id) => repo.find_by_category(category_id).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(dishes))
}

/// GET /api/dishes/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Dish>> {
    let repo = DishRepository::new(state.pool());
    let dish = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dish {id} not found")))?;
    Ok(Json(dish))
}

/// POST /api/dishes - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    let repo = DishRepository::new(state.pool());
    let dish = repo.create(payload).await?;
    Ok(Json(dish))
}

/// PUT /api/dishes/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    let repo = DishRepository::new(state.pool());
    let dish = repo.update(id, payload).await?;
    Ok(Json(dish))
}

/// DELETE /api/dishes/{id} - 删除菜品 (历史票据项保留快照)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = DishRepository::new(state.pool());
    let deleted = repo.delete(id).await?;
    Ok(Json(deleted))
}
