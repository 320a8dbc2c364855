use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::{CoreError, CoreResult};

/// A property guests can book, priced per night.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_per_night: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both create and full replace.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    pub price_per_night: Decimal,
}

impl ListingInput {
    pub fn validate(&self) -> CoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::ValidationError("title is required".to_string()));
        }
        if self.location.trim().is_empty() {
            return Err(CoreError::ValidationError("location is required".to_string()));
        }
        if self.price_per_night.is_sign_negative() {
            return Err(CoreError::ValidationError("price_per_night must not be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_input_deserialization() {
        let json = r#"
            {
                "title": "Cliffside lodge",
                "location": "Lalibela",
                "price_per_night": "150.00"
            }
        "#;
        let input: ListingInput = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(input.description, "");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let input = ListingInput {
            title: "Lodge".to_string(),
            description: String::new(),
            location: "Gondar".to_string(),
            price_per_night: Decimal::new(-100, 2),
        };
        assert!(matches!(input.validate(), Err(CoreError::ValidationError(_))));
    }
}
