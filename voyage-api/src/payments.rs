use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use voyage_payment::InitializePaymentRequest;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/initiate-payment/", post(initiate_payment))
        .route("/api/verify-payment/{tx_ref}/", get(verify_payment))
}

/// An empty body is an empty request, so the controller reports what is missing.
/// The content type is not checked.
fn parse_initialize_body(body: &[u8]) -> Result<InitializePaymentRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InitializePaymentRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationError(format!("Invalid JSON body: {}", e)))
}

/// Answers with the gateway's body as-is; clients read `data.checkout_url` from it.
async fn initiate_payment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let req = parse_initialize_body(&body)?;
    Ok(Json(state.payments.initialize(&req).await?))
}

async fn verify_payment(
    State(state): State<AppState>,
    Path(tx_ref): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.payments.verify(&tx_ref).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_body_is_an_empty_request() {
        for body in [&b""[..], &b"  \n"[..]] {
            let req = parse_initialize_body(body).unwrap();
            assert!(req.booking_reference.is_none());
        }
    }

    #[test]
    fn test_body_fields_stay_loose() {
        let req = parse_initialize_body(br#"{"booking_reference": "4", "first_name": 7}"#).unwrap();
        assert_eq!(req.booking_reference, Some(json!("4")));
        assert_eq!(req.first_name, Some(json!(7)));
    }

    #[test]
    fn test_malformed_body_is_validation_error() {
        for body in [&b"{not json"[..], &b"[1, 2]"[..]] {
            let err = parse_initialize_body(body).unwrap_err();
            assert!(matches!(err, AppError::ValidationError(ref m) if m.starts_with("Invalid JSON body")));
        }
    }
}
