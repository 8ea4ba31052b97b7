//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use quickcar_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

fn user_from_row(
    row: (i32, String, DateTime<Utc>, DateTime<Utc>),
) -> Result<User, RepositoryError> {
    let (id, email, created_at, updated_at) = row;
    let email = Email::parse(&email)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;
    Ok(User {
        id: UserId::new(id),
        email,
        created_at,
        updated_at,
    })
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<(i32, String, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, email, created_at, updated_at FROM site.user WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    /// Create a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: (i32, String, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO site.user (email) VALUES ($1)
             RETURNING id, email, created_at, updated_at",
        )
        .bind(email.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let user = user_from_row(row)?;

        sqlx::query("INSERT INTO site.user_password (user_id, password_hash) VALUES ($1, $2)")
            .bind(user.id.as_i32())
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<(i32, String, DateTime<Utc>, DateTime<Utc>, Option<String>)> =
            sqlx::query_as(
                "SELECT u.id, u.email, u.created_at, u.updated_at, p.password_hash
                 FROM site.user u
                 LEFT JOIN site.user_password p ON u.id = p.user_id
                 WHERE u.email = $1",
            )
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        let Some((id, email, created_at, updated_at, password_hash)) = row else {
            return Ok(None);
        };
        let Some(password_hash) = password_hash else {
            return Ok(None);
        };

        let user = user_from_row((id, email, created_at, updated_at))?;
        Ok(Some((user, password_hash)))
    }
}
