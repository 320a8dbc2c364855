use voyage_core::payment::GatewayError;
use voyage_core::repository::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Gateway secret missing.
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Validation(String),
    #[error("Failed to call payment gateway: {0}")]
    GatewayUnreachable(String),
    /// Provider answered but did not accept the transaction; carries its raw body.
    #[error("Failed to initialize payment")]
    GatewayRejected(serde_json::Value),
    #[error("{0}")]
    NotFound(String),
    #[error("payment store error: {0}")]
    Store(String),
}

impl PaymentError {
    pub(crate) fn store(err: RepoError) -> Self {
        PaymentError::Store(err.to_string())
    }
}

impl From<GatewayError> for PaymentError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unreachable(msg) => PaymentError::GatewayUnreachable(msg),
        }
    }
}
