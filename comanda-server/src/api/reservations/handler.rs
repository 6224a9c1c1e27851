//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{Reservation, ReservationCreate, ReservationStatusUpdate};

use crate::core::ServerState;
use crate::db::repository::ReservationRepository;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub date: Option<NaiveDate>,
}

/// GET /api/reservations - 全部或按日期过滤
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Reservation>>> {
    let repo = ReservationRepository::new(state.pool());
    let reservations = match params.date {
        Some(date) => repo.find_by_date(date).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(reservations))
}

/// POST /api/reservations - 公开订座
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.pool());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/reservations/{id}/status - 确认/取消
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationStatusUpdate>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.pool());
    Ok(Json(repo.update_status(id, payload.status).await?))
}
