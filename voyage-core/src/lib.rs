pub mod user;
pub mod listing;
pub mod booking;
pub mod review;
pub mod payment;
pub mod repository;
pub mod notification;
pub mod validation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
