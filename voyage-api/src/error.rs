use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use voyage_core::repository::RepoError;
use voyage_core::CoreError;
use voyage_payment::PaymentError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    /// Provider answered without accepting; its body goes back under `details`.
    GatewayRejected(Value),
    BadGateway(String),
    /// Server misconfiguration the operator must fix; message is safe to expose.
    ConfigurationError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::GatewayRejected(body) => (
                StatusCode::BAD_REQUEST,
                "Failed to initialize payment".to_string(),
                Some(body),
            ),
            AppError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                "Failed to call payment gateway".to_string(),
                Some(Value::String(msg)),
            ),
            AppError::ConfigurationError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            }
        };

        let body = match details {
            Some(details) => json!({ "error": error_message, "details": details }),
            None => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Configuration(msg) => AppError::ConfigurationError(msg),
            PaymentError::Validation(msg) => AppError::ValidationError(msg),
            PaymentError::GatewayUnreachable(msg) => AppError::BadGateway(msg),
            PaymentError::GatewayRejected(body) => AppError::GatewayRejected(body),
            PaymentError::NotFound(msg) => AppError::NotFoundError(msg),
            PaymentError::Store(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
            CoreError::NotFound(msg) => AppError::NotFoundError(msg),
            CoreError::InternalError(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}
