use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a payment attempt: `Pending -> Completed | Failed`, never back to `Pending`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        }
    }

    /// Status after the gateway has reported on the transaction.
    pub fn settle(succeeded: bool) -> Self {
        if succeeded {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Failed
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Completed" => Ok(PaymentStatus::Completed),
            "Failed" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status: {}", other)),
        }
    }
}

/// One payment attempt against a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub booking_reference: String,
    pub amount: Decimal,
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Applies a verification result. Re-applying the same result is a no-op.
    pub fn apply_verification(&mut self, succeeded: bool) {
        self.status = PaymentStatus::settle(succeeded);
        self.updated_at = Utc::now();
    }
}

/// Row created after a successful gateway initialization; always starts `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub booking_reference: String,
    pub amount: Decimal,
    pub transaction_id: String,
}

/// `booking-<booking id>-<unix seconds>`
pub fn transaction_reference(booking_id: i64, now: DateTime<Utc>) -> String {
    format!("booking-{}-{}", booking_id, now.timestamp())
}

/// Payload sent to the gateway's initialize endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InitializeTransaction {
    pub amount: Decimal,
    pub currency: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub tx_ref: String,
    pub callback_url: String,
}

/// Raw gateway reply: HTTP status plus the parsed JSON body, passed back to callers untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub http_status: u16,
    pub body: serde_json::Value,
}

impl GatewayResponse {
    pub fn new(http_status: u16, body: serde_json::Value) -> Self {
        Self { http_status, body }
    }

    /// Top-level `"status": "success"`.
    pub fn reports_success(&self) -> bool {
        self.body.get("status").and_then(|s| s.as_str()) == Some("success")
    }

    /// `data` is present and not empty, zero or `false`.
    pub fn has_data(&self) -> bool {
        match self.body.get("data") {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(serde_json::Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(serde_json::Value::Bool(b)) => *b,
        }
    }

    /// `data.status == "success"`.
    pub fn reports_settled_success(&self) -> bool {
        self.body
            .get("data")
            .and_then(|d| d.get("status"))
            .and_then(|s| s.as_str())
            == Some("success")
    }

    pub fn is_http_ok(&self) -> bool {
        matches!(self.http_status, 200 | 201)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("payment gateway unreachable: {0}")]
    Unreachable(String),
}

/// Outbound port to the payment provider. No retries; callers decide from the response.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a transaction with the provider.
    async fn initialize(
        &self,
        payload: &InitializeTransaction,
        secret_key: &str,
    ) -> Result<GatewayResponse, GatewayError>;

    /// Look up a transaction by its reference.
    async fn verify(
        &self,
        tx_ref: &str,
        secret_key: &str,
    ) -> Result<GatewayResponse, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_transaction_reference_format() {
        let now = Utc.timestamp_opt(1_760_000_000, 0).unwrap();
        assert_eq!(transaction_reference(42, now), "booking-42-1760000000");
    }

    #[test]
    fn test_status_round_trip_through_text() {
        for status in [PaymentStatus::Pending, PaymentStatus::Completed, PaymentStatus::Failed] {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
        assert!("Refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_verification_never_returns_to_pending() {
        let mut payment = Payment {
            id: 1,
            booking_reference: "5".to_string(),
            amount: Decimal::new(15000, 2),
            transaction_id: "booking-5-1".to_string(),
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        payment.apply_verification(true);
        assert_eq!(payment.status, PaymentStatus::Completed);

        payment.apply_verification(true);
        assert_eq!(payment.status, PaymentStatus::Completed);

        payment.apply_verification(false);
        assert_eq!(payment.status, PaymentStatus::Failed);
    }

    #[test]
    fn test_gateway_response_checks() {
        let ok = GatewayResponse::new(
            200,
            json!({"status": "success", "data": {"checkout_url": "https://checkout.example/abc"}}),
        );
        assert!(ok.is_http_ok() && ok.reports_success() && ok.has_data());

        let empty_data = GatewayResponse::new(201, json!({"status": "success", "data": null}));
        assert!(!empty_data.has_data());
        for falsy in [json!(0), json!(0.0), json!(false), json!(""), json!([]), json!({})] {
            let response = GatewayResponse::new(200, json!({"status": "success", "data": falsy}));
            assert!(!response.has_data(), "{}", response.body);
        }
        assert!(GatewayResponse::new(200, json!({"status": "success", "data": 1})).has_data());
        assert!(GatewayResponse::new(200, json!({"status": "success", "data": true})).has_data());

        let rejected = GatewayResponse::new(400, json!({"status": "failed", "message": "Invalid currency"}));
        assert!(!rejected.is_http_ok());
        assert!(!rejected.reports_success());

        let settled = GatewayResponse::new(200, json!({"status": "success", "data": {"status": "success"}}));
        assert!(settled.reports_settled_success());

        let pending = GatewayResponse::new(200, json!({"status": "success", "data": {"status": "pending"}}));
        assert!(!pending.reports_settled_success());

        let no_data = GatewayResponse::new(200, json!({"status": "success"}));
        assert!(!no_data.reports_settled_success());
    }
}
