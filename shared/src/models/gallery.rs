//! Gallery Model

use serde::{Deserialize, Serialize};

/// Gallery image record. Storage mechanics live elsewhere; this is just
/// the path + display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GalleryImage {
    pub id: i64,
    pub title: String,
    pub image_path: String,
    pub sort_order: i32,
}

/// Create gallery image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImageCreate {
    pub title: String,
    pub image_path: String,
    pub sort_order: Option<i32>,
}

/// Update gallery image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImageUpdate {
    pub title: Option<String>,
    pub image_path: Option<String>,
    pub sort_order: Option<i32>,
}
