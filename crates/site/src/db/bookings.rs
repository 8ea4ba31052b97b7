//! Booking draft and service record repository.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use quickcar_core::{
    Amount, BookingDraft, ServiceRecord, ServiceRecordId, ServiceStatus, UserId, VehicleId,
};

use super::RepositoryError;

type RecordRow = (
    i32,
    String,
    String,
    Option<i32>,
    Option<NaiveDate>,
    String,
    i64,
    Option<i16>,
    Option<String>,
    DateTime<Utc>,
);

fn record_from_row(row: RecordRow) -> Result<ServiceRecord, RepositoryError> {
    let (id, service_id, service_type, vehicle_id, date, status, amount, rating, feedback, created_at) =
        row;

    let status = ServiceStatus::from_str(&status).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid service status in database: {e}"))
    })?;

    let rating = rating
        .map(|r| {
            u8::try_from(r).map_err(|_| {
                RepositoryError::DataCorruption(format!("rating out of range in database: {r}"))
            })
        })
        .transpose()?;

    Ok(ServiceRecord {
        id: ServiceRecordId::new(id),
        service_id,
        service_type,
        vehicle_id: vehicle_id.map(VehicleId::new),
        date,
        status,
        amount: Amount::from_paise(amount),
        rating,
        feedback,
        created_at,
    })
}

/// Repository for booking drafts and service records.
pub struct BookingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookingRepository<'a> {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's in-flight booking draft, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_draft(&self, user_id: UserId) -> Result<Option<BookingDraft>, RepositoryError> {
        let row: Option<(Json<BookingDraft>,)> =
            sqlx::query_as("SELECT draft FROM site.booking_draft WHERE user_id = $1")
                .bind(user_id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(|(Json(draft),)| draft))
    }

    /// Insert or replace the user's booking draft. One draft per user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_draft(
        &self,
        user_id: UserId,
        draft: &BookingDraft,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO site.booking_draft (user_id, draft)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET draft = EXCLUDED.draft, updated_at = NOW()",
        )
        .bind(user_id.as_i32())
        .bind(Json(draft))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove the user's booking draft, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_draft(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM site.booking_draft WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// List the user's service records, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_records(&self, user_id: UserId) -> Result<Vec<ServiceRecord>, RepositoryError> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            "SELECT id, service_id, service_type, vehicle_id, service_date, status,
                    amount_paise, rating, feedback, created_at
             FROM site.service_record
             WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    /// Get a single service record, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_record(
        &self,
        user_id: UserId,
        record_id: ServiceRecordId,
    ) -> Result<Option<ServiceRecord>, RepositoryError> {
        let row: Option<RecordRow> = sqlx::query_as(
            "SELECT id, service_id, service_type, vehicle_id, service_date, status,
                    amount_paise, rating, feedback, created_at
             FROM site.service_record
             WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id.as_i32())
        .bind(record_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }

    /// Insert a service record after a successful payment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the service ID is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert_record(
        &self,
        user_id: UserId,
        service_id: &str,
        service_type: &str,
        vehicle_id: Option<VehicleId>,
        date: Option<NaiveDate>,
        amount: Amount,
    ) -> Result<ServiceRecord, RepositoryError> {
        let row: RecordRow = sqlx::query_as(
            "INSERT INTO site.service_record
                 (user_id, service_id, service_type, vehicle_id, service_date, status, amount_paise)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, service_id, service_type, vehicle_id, service_date, status,
                       amount_paise, rating, feedback, created_at",
        )
        .bind(user_id.as_i32())
        .bind(service_id)
        .bind(service_type)
        .bind(vehicle_id.map(|v| v.as_i32()))
        .bind(date)
        .bind(ServiceStatus::Confirmed.to_string())
        .bind(amount.as_paise())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("service ID already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        record_from_row(row)
    }

    /// Update a record's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the record doesn't belong to the user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        user_id: UserId,
        record_id: ServiceRecordId,
        status: ServiceStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE site.service_record SET status = $1, updated_at = NOW()
             WHERE user_id = $2 AND id = $3",
        )
        .bind(status.to_string())
        .bind(user_id.as_i32())
        .bind(record_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
