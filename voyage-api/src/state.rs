use std::sync::Arc;
use sqlx::PgPool;
use voyage_core::notification::EmailQueue;
use voyage_core::repository::{
    BookingRepository, ListingRepository, PaymentRepository, ReviewRepository, UserRepository,
};
use voyage_payment::PaymentFlowController;
use voyage_store::{
    MemoryStore, StoreBookingRepository, StoreListingRepository, StorePaymentRepository,
    StoreReviewRepository, StoreUserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub email_queue: Arc<dyn EmailQueue>,
    pub payments: Arc<PaymentFlowController>,
}

/// One handle per repository port, backed by a single storage engine.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub payments: Arc<dyn PaymentRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(StoreUserRepository::new(pool.clone())),
            listings: Arc::new(StoreListingRepository::new(pool.clone())),
            bookings: Arc::new(StoreBookingRepository::new(pool.clone())),
            reviews: Arc::new(StoreReviewRepository::new(pool.clone())),
            payments: Arc::new(StorePaymentRepository::new(pool)),
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            listings: Arc::new(store.clone()),
            bookings: Arc::new(store.clone()),
            reviews: Arc::new(store.clone()),
            payments: Arc::new(store),
        }
    }
}

impl AppState {
    pub fn new(
        repos: Repositories,
        email_queue: Arc<dyn EmailQueue>,
        payments: PaymentFlowController,
    ) -> Self {
        Self {
            users: repos.users,
            listings: repos.listings,
            bookings: repos.bookings,
            reviews: repos.reviews,
            email_queue,
            payments: Arc::new(payments),
        }
    }
}
