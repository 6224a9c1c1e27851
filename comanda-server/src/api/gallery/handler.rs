//! Gallery API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{GalleryImage, GalleryImageCreate, GalleryImageUpdate};

use crate::core::ServerState;
use crate::db::repository::GalleryRepository;
use crate::utils::AppResult;

/// GET /api/gallery
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<GalleryImage>>> {
    let repo = GalleryRepository::new(state.pool());
    Ok(Json(repo.find_all().await?))
}

/// POST /api/gallery
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GalleryImageCreate>,
) -> AppResult<Json<GalleryImage>> {
    let repo = GalleryRepository::new(state.pool());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/gallery/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<GalleryImageUpdate>,
) -> AppResult<Json<GalleryImage>> {
    let repo = GalleryRepository::new(state.pool());
    Ok(Json(repo.update(id, payload).await?))
}

/// DELETE /api/gallery/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = GalleryRepository::new(state.pool());
    Ok(Json(repo.delete(id).await?))
}
