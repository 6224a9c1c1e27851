//! Reservation Repository

use chrono::NaiveDate;
use shared::models::{Reservation, ReservationCreate, ReservationStatus};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations ORDER BY date DESC, time_slot",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> RepoResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE date = ? ORDER BY time_slot",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Reservation>> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(reservation)
    }

    pub async fn create(&self, data: ReservationCreate) -> RepoResult<Reservation> {
        if data.party_size == 0 {
            return Err(RepoError::Validation("Party size must be positive".into()));
        }

        let id = sqlx::query(
            "INSERT INTO reservations (name, phone, party_size, date, time_slot, status)
             VALUES (?, ?, ?, ?, ?, 'pending')",
        )
        .bind(&data.name)
        .bind(&data.phone)
        .bind(data.party_size)
        .bind(data.date)
        .bind(&data.time_slot)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> RepoResult<Reservation> {
        let affected = sqlx::query("UPDATE reservations SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(RepoError::NotFound(format!("Reservation {id} not found")));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to reload reservation".into()))
    }
}
