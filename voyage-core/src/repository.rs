use async_trait::async_trait;
use crate::booking::{Booking, BookingDetails, NewBooking};
use crate::listing::{Listing, ListingInput};
use crate::payment::{NewPayment, Payment, PaymentStatus};
use crate::review::{Review, ReviewInput};
use crate::user::{NewUser, User};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User, RepoError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError>;

    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create_listing(&self, listing: &ListingInput) -> Result<Listing, RepoError>;

    async fn get_listing(&self, id: i64) -> Result<Option<Listing>, RepoError>;

    async fn list_listings(&self) -> Result<Vec<Listing>, RepoError>;

    /// Full replace; `None` when the listing does not exist.
    async fn update_listing(
        &self,
        id: i64,
        listing: &ListingInput,
    ) -> Result<Option<Listing>, RepoError>;

    /// `true` when a row was removed.
    async fn delete_listing(&self, id: i64) -> Result<bool, RepoError>;
}

/// Bookings have no update path.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, RepoError>;

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>, RepoError>;

    /// Booking joined with its guest and listing.
    async fn get_booking_details(&self, id: i64) -> Result<Option<BookingDetails>, RepoError>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, RepoError>;

    async fn delete_booking(&self, id: i64) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create_review(&self, review: &ReviewInput) -> Result<Review, RepoError>;

    async fn get_review(&self, id: i64) -> Result<Option<Review>, RepoError>;

    async fn list_reviews(&self) -> Result<Vec<Review>, RepoError>;

    async fn update_review(
        &self,
        id: i64,
        review: &ReviewInput,
    ) -> Result<Option<Review>, RepoError>;

    async fn delete_review(&self, id: i64) -> Result<bool, RepoError>;
}

/// Payment rows are created and status-updated only; never deleted.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Inserts a `Pending` row. Fails if `transaction_id` already exists.
    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, RepoError>;

    async fn get_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, RepoError>;

    /// Persists the status of an existing payment and returns the updated row.
    async fn update_payment_status(
        &self,
        transaction_id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, RepoError>;

    async fn list_payments_for_booking(
        &self,
        booking_reference: &str,
    ) -> Result<Vec<Payment>, RepoError>;
}
