//! Dish Model

use serde::{Deserialize, Deserializer, Serialize};

/// Dish entity (menu catalog)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Catalog price. Tickets and orders snapshot this at submission time.
    pub price: f64,
    pub category_id: Option<i64>,
    pub image_path: Option<String>,
    pub is_available: bool,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category_id: Option<i64>,
    pub image_path: Option<String>,
    pub is_available: Option<bool>,
}

/// Update dish payload
///
/// 可空字段区分 "未出现" 与 "显式 null": 缺省保持现值，null 清空。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_path: Option<Option<String>>,
    pub is_available: Option<bool>,
}

/// Maps a present field (including `null`) to `Some`, so the outer
/// `Option` tracks presence and the inner one the value
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
