//! Daily Menu Model
//!
//! "Menú del día": fixed-price menu active over a date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyMenu {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Free-text course list, one course per line
    #[serde(default)]
    pub courses: String,
    pub active_from: NaiveDate,
    pub active_until: NaiveDate,
}

/// Create daily menu payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMenuCreate {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub courses: String,
    pub active_from: NaiveDate,
    pub active_until: NaiveDate,
}

/// Update daily menu payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMenuUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub courses: Option<String>,
    pub active_from: Option<NaiveDate>,
    pub active_until: Option<NaiveDate>,
}
