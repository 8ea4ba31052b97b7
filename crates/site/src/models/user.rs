//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quickcar_core::{Email, UserId};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database ID.
    pub id: UserId,
    /// Account email, the identity key.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}
