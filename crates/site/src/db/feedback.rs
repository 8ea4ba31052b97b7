//! Feedback repository.

use quickcar_core::{FeedbackId, ServiceRecordId, UserId};
use sqlx::PgPool;

use super::RepositoryError;

/// Repository for service feedback.
pub struct FeedbackRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FeedbackRepository<'a> {
    /// Create a new feedback repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record feedback on a service and mirror the rating onto the record.
    ///
    /// Returns the ID of the new feedback row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the record doesn't belong to the user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn submit(
        &self,
        user_id: UserId,
        record_id: ServiceRecordId,
        rating: u8,
        comment: Option<&str>,
    ) -> Result<FeedbackId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE site.service_record SET rating = $1, feedback = $2, updated_at = NOW()
             WHERE user_id = $3 AND id = $4",
        )
        .bind(i16::from(rating))
        .bind(comment)
        .bind(user_id.as_i32())
        .bind(record_id.as_i32())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let (feedback_id,): (FeedbackId,) = sqlx::query_as(
            "INSERT INTO site.feedback (user_id, service_record_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(user_id.as_i32())
        .bind(record_id.as_i32())
        .bind(i16::from(rating))
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(feedback_id)
    }
}
