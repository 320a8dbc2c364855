use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::{CoreError, CoreResult};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub listing_id: i64,
    pub user_id: i64,
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

impl ReviewInput {
    pub fn validate(&self) -> CoreResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(CoreError::ValidationError(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        Ok(())
    }
}
