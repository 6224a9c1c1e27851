//! Reservation Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Table reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub party_size: u32,
    pub date: NaiveDate,
    /// Time slot, e.g. "13:30"
    pub time_slot: String,
    pub status: ReservationStatus,
}

/// Create reservation payload (public endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub name: String,
    pub phone: String,
    pub party_size: u32,
    pub date: NaiveDate,
    pub time_slot: String,
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: ReservationStatus,
}
