use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use crate::listing::Listing;
use crate::user::User;
use crate::{CoreError, CoreResult};

/// A guest's reservation of a listing. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
    pub destination: String,
    pub date: NaiveDate,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Text block embedded in the confirmation email.
    pub fn confirmation_details(&self) -> String {
        format!(
            "Destination: {}\nDate: {}\nPrice: {}",
            self.destination, self.date, self.price
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub user_id: i64,
    pub listing_id: i64,
    pub destination: String,
    pub date: NaiveDate,
    pub price: Decimal,
}

impl NewBooking {
    pub fn validate(&self) -> CoreResult<()> {
        if self.destination.trim().is_empty() {
            return Err(CoreError::ValidationError("destination is required".to_string()));
        }
        if self.price.is_sign_negative() {
            return Err(CoreError::ValidationError("price must not be negative".to_string()));
        }
        Ok(())
    }
}

/// A booking joined with the guest and the listing, as the payment flow reads it.
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking: Booking,
    pub user: User,
    pub listing: Listing,
}
