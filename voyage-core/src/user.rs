use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::{validation, CoreError, CoreResult};

/// Account that owns bookings and reviews.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl NewUser {
    pub fn validate(&self) -> CoreResult<()> {
        if !validation::is_valid_email(self.email.trim()) {
            return Err(CoreError::ValidationError("Invalid email format".to_string()));
        }
        Ok(())
    }
}
