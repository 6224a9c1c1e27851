//! Online Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Order, OrderCreate, OrderStatusUpdate};

use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/orders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.pool());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(order))
}

/// POST /api/orders - 公开下单，行项目价格取目录现价快照
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    Ok(Json(repo.update_status(id, payload.status).await?))
}
