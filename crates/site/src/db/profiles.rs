//! Profile and garage repository.

use quickcar_core::{ContactChannel, ServicePreferences, UserId, Vehicle, VehicleId};
use sqlx::PgPool;

use super::RepositoryError;

/// Contact details and preferences stored on the profile row.
///
/// Vehicles and service history live in their own tables and are assembled
/// into a [`quickcar_core::UserProfile`] by the booking service.
#[derive(Debug, Clone, Default)]
pub struct ProfileDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub preferences: ServicePreferences,
}

/// New vehicle data, before the database assigns an ID.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: String,
    pub mileage: i32,
}

const fn channel_as_str(channel: ContactChannel) -> &'static str {
    match channel {
        ContactChannel::Sms => "sms",
        ContactChannel::Email => "email",
        ContactChannel::Phone => "phone",
    }
}

fn channel_from_str(s: &str) -> Result<ContactChannel, RepositoryError> {
    match s {
        "sms" => Ok(ContactChannel::Sms),
        "email" => Ok(ContactChannel::Email),
        "phone" => Ok(ContactChannel::Phone),
        other => Err(RepositoryError::DataCorruption(format!(
            "unknown contact channel in database: {other}"
        ))),
    }
}

type VehicleRow = (i32, String, String, i32, String, String, i32, bool);

fn vehicle_from_row(row: VehicleRow) -> Vehicle {
    let (id, make, model, year, license_plate, color, mileage, is_default) = row;
    Vehicle {
        id: VehicleId::new(id),
        make,
        model,
        year,
        license_plate,
        color,
        mileage,
        is_default,
    }
}

/// Repository for profile and vehicle database operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the profile row for a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<ProfileDetails>, RepositoryError> {
        let row: Option<(String, String, String, bool, String)> = sqlx::query_as(
            "SELECT name, phone, address, reminders, contact_channel
             FROM site.profile WHERE user_id = $1",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some((name, phone, address, reminders, contact_channel)) = row else {
            return Ok(None);
        };

        Ok(Some(ProfileDetails {
            name,
            phone,
            address,
            preferences: ServicePreferences {
                reminders,
                contact_channel: channel_from_str(&contact_channel)?,
            },
        }))
    }

    /// Insert or update the profile row for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        details: &ProfileDetails,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO site.profile (user_id, name, phone, address, reminders, contact_channel)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id) DO UPDATE SET
                 name = EXCLUDED.name,
                 phone = EXCLUDED.phone,
                 address = EXCLUDED.address,
                 reminders = EXCLUDED.reminders,
                 contact_channel = EXCLUDED.contact_channel,
                 updated_at = NOW()",
        )
        .bind(user_id.as_i32())
        .bind(&details.name)
        .bind(&details.phone)
        .bind(&details.address)
        .bind(details.preferences.reminders)
        .bind(channel_as_str(details.preferences.contact_channel))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List a user's vehicles, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_vehicles(&self, user_id: UserId) -> Result<Vec<Vehicle>, RepositoryError> {
        let rows: Vec<VehicleRow> = sqlx::query_as(
            "SELECT id, make, model, year, license_plate, color, mileage, is_default
             FROM site.vehicle WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(vehicle_from_row).collect())
    }

    /// Get a single vehicle, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_vehicle(
        &self,
        user_id: UserId,
        vehicle_id: VehicleId,
    ) -> Result<Option<Vehicle>, RepositoryError> {
        let row: Option<VehicleRow> = sqlx::query_as(
            "SELECT id, make, model, year, license_plate, color, mileage, is_default
             FROM site.vehicle WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id.as_i32())
        .bind(vehicle_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(vehicle_from_row))
    }

    /// Insert a vehicle. When `is_default` is set, any previous default for
    /// the user is cleared in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_vehicle(
        &self,
        user_id: UserId,
        vehicle: &NewVehicle,
        is_default: bool,
    ) -> Result<Vehicle, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if is_default {
            sqlx::query("UPDATE site.vehicle SET is_default = FALSE WHERE user_id = $1")
                .bind(user_id.as_i32())
                .execute(&mut *tx)
                .await?;
        }

        let row: VehicleRow = sqlx::query_as(
            "INSERT INTO site.vehicle
                 (user_id, make, model, year, license_plate, color, mileage, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, make, model, year, license_plate, color, mileage, is_default",
        )
        .bind(user_id.as_i32())
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.color)
        .bind(vehicle.mileage)
        .bind(is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(vehicle_from_row(row))
    }

    /// Update a vehicle's details. The default flag is not touched here;
    /// use [`Self::set_default_vehicle`] for that.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vehicle doesn't belong to the user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_vehicle(
        &self,
        user_id: UserId,
        vehicle_id: VehicleId,
        vehicle: &NewVehicle,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE site.vehicle
             SET make = $1, model = $2, year = $3, license_plate = $4,
                 color = $5, mileage = $6, updated_at = NOW()
             WHERE user_id = $7 AND id = $8",
        )
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.color)
        .bind(vehicle.mileage)
        .bind(user_id.as_i32())
        .bind(vehicle_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Make a vehicle the user's default, clearing any previous default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vehicle doesn't belong to the user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_default_vehicle(
        &self,
        user_id: UserId,
        vehicle_id: VehicleId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE site.vehicle SET is_default = FALSE WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        let result =
            sqlx::query("UPDATE site.vehicle SET is_default = TRUE WHERE user_id = $1 AND id = $2")
                .bind(user_id.as_i32())
                .bind(vehicle_id.as_i32())
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    /// Delete a vehicle row.
    ///
    /// The garage rules (never delete the last vehicle, promote a new default)
    /// are enforced by the caller before this runs; this only removes the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vehicle doesn't belong to the user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_vehicle(
        &self,
        user_id: UserId,
        vehicle_id: VehicleId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM site.vehicle WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_i32())
            .bind(vehicle_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
