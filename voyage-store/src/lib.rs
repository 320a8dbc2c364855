pub mod app_config;
pub mod database;
pub mod events;
pub mod memory;
pub mod user_repo;
pub mod listing_repo;
pub mod booking_repo;
pub mod review_repo;
pub mod payment_repo;

pub use database::DbClient;
pub use events::{ChannelEmailQueue, KafkaEmailQueue};
pub use memory::MemoryStore;
pub use user_repo::StoreUserRepository;
pub use listing_repo::StoreListingRepository;
pub use booking_repo::StoreBookingRepository;
pub use review_repo::StoreReviewRepository;
pub use payment_repo::StorePaymentRepository;
