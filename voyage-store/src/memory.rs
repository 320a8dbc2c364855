use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use voyage_core::booking::{Booking, BookingDetails, NewBooking};
use voyage_core::listing::{Listing, ListingInput};
use voyage_core::payment::{NewPayment, Payment, PaymentStatus};
use voyage_core::repository::{
    BookingRepository, ListingRepository, PaymentRepository, RepoError, ReviewRepository,
    UserRepository,
};
use voyage_core::review::{Review, ReviewInput};
use voyage_core::user::{NewUser, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    listings: BTreeMap<i64, Listing>,
    bookings: BTreeMap<i64, Booking>,
    reviews: BTreeMap<i64, Review>,
    payments: BTreeMap<i64, Payment>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store behind every repository port.
///
/// Ids come from one shared sequence. `transaction_id` uniqueness is enforced
/// like the Postgres UNIQUE index; foreign keys are not.
#[derive(Default, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let user = User {
            id,
            email: user.email.trim().to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn create_listing(&self, listing: &ListingInput) -> Result<Listing, RepoError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let now = Utc::now();
        let listing = Listing {
            id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            location: listing.location.clone(),
            price_per_night: listing.price_per_night,
            created_at: now,
            updated_at: now,
        };
        tables.listings.insert(id, listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, id: i64) -> Result<Option<Listing>, RepoError> {
        Ok(self.tables.read().await.listings.get(&id).cloned())
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, RepoError> {
        Ok(self.tables.read().await.listings.values().cloned().collect())
    }

    async fn update_listing(
        &self,
        id: i64,
        listing: &ListingInput,
    ) -> Result<Option<Listing>, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.listings.get_mut(&id).map(|existing| {
            existing.title = listing.title.clone();
            existing.description = listing.description.clone();
            existing.location = listing.location.clone();
            existing.price_per_night = listing.price_per_night;
            existing.updated_at = Utc::now();
            existing.clone()
        }))
    }

    async fn delete_listing(&self, id: i64) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let removed = tables.listings.remove(&id).is_some();
        if removed {
            tables.bookings.retain(|_, b| b.listing_id != id);
            tables.reviews.retain(|_, r| r.listing_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, RepoError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let booking = Booking {
            id,
            user_id: booking.user_id,
            listing_id: booking.listing_id,
            destination: booking.destination.clone(),
            date: booking.date,
            price: booking.price,
            created_at: Utc::now(),
        };
        tables.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>, RepoError> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn get_booking_details(&self, id: i64) -> Result<Option<BookingDetails>, RepoError> {
        let tables = self.tables.read().await;
        let Some(booking) = tables.bookings.get(&id) else {
            return Ok(None);
        };
        let user = tables.users.get(&booking.user_id);
        let listing = tables.listings.get(&booking.listing_id);

        Ok(match (user, listing) {
            (Some(user), Some(listing)) => Some(BookingDetails {
                booking: booking.clone(),
                user: user.clone(),
                listing: listing.clone(),
            }),
            _ => None,
        })
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, RepoError> {
        Ok(self.tables.read().await.bookings.values().cloned().collect())
    }

    async fn delete_booking(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.tables.write().await.bookings.remove(&id).is_some())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn create_review(&self, review: &ReviewInput) -> Result<Review, RepoError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let review = Review {
            id,
            listing_id: review.listing_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: Utc::now(),
        };
        tables.reviews.insert(id, review.clone());
        Ok(review)
    }

    async fn get_review(&self, id: i64) -> Result<Option<Review>, RepoError> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, RepoError> {
        Ok(self.tables.read().await.reviews.values().cloned().collect())
    }

    async fn update_review(
        &self,
        id: i64,
        review: &ReviewInput,
    ) -> Result<Option<Review>, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.reviews.get_mut(&id).map(|existing| {
            existing.listing_id = review.listing_id;
            existing.user_id = review.user_id;
            existing.rating = review.rating;
            existing.comment = review.comment.clone();
            existing.clone()
        }))
    }

    async fn delete_review(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .payments
            .values()
            .any(|p| p.transaction_id == payment.transaction_id)
        {
            return Err(format!(
                "duplicate key value violates unique constraint: transaction_id={}",
                payment.transaction_id
            )
            .into());
        }

        let id = tables.next_id();
        let now = Utc::now();
        let payment = Payment {
            id,
            booking_reference: payment.booking_reference.clone(),
            amount: payment.amount,
            transaction_id: payment.transaction_id.clone(),
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn get_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .values()
            .find(|p| p.transaction_id == transaction_id)
            .cloned())
    }

    async fn update_payment_status(
        &self,
        transaction_id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .payments
            .values_mut()
            .find(|p| p.transaction_id == transaction_id)
            .map(|p| {
                p.status = status;
                p.updated_at = Utc::now();
                p.clone()
            }))
    }

    async fn list_payments_for_booking(
        &self,
        booking_reference: &str,
    ) -> Result<Vec<Payment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .values()
            .filter(|p| p.booking_reference == booking_reference)
            .cloned()
            .collect())
    }
}
