use crate::pii::Masked;

/// Queue payload for the booking confirmation email task.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingConfirmationEmail {
    pub recipient: Masked<String>,
    pub booking_details: String,
    pub enqueued_at: i64,
}

impl BookingConfirmationEmail {
    pub fn new(recipient: impl Into<String>, booking_details: impl Into<String>) -> Self {
        Self {
            recipient: Masked(recipient.into()),
            booking_details: booking_details.into(),
            enqueued_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn subject(&self) -> &'static str {
        "Booking Confirmation"
    }

    pub fn body(&self) -> String {
        format!("Thank you for your booking!\n\nDetails:\n{}", self.booking_details)
    }
}
