pub mod models;
pub mod pii;

pub use models::events::BookingConfirmationEmail;
pub use pii::Masked;
