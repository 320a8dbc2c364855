use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use voyage_core::payment::{
    transaction_reference, InitializeTransaction, NewPayment, PaymentGateway,
};
use voyage_core::repository::{BookingRepository, PaymentRepository};
use voyage_core::validation::{is_blank, is_valid_email, parse_amount};
use voyage_shared::Masked;
use crate::error::PaymentError;

pub const CURRENCY: &str = "ETB";

/// Gateway settings injected at construction.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub secret_key: Option<String>,
    pub callback_url: String,
}

/// Body of `POST /api/initiate-payment/`.
///
/// Every field stays loosely typed so that bad input surfaces as a
/// `Validation` error rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitializePaymentRequest {
    #[serde(default)]
    pub booking_reference: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub first_name: Option<Value>,
    #[serde(default)]
    pub last_name: Option<Value>,
}

pub struct PaymentFlowController {
    gateway: Arc<dyn PaymentGateway>,
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentRepository>,
    settings: GatewaySettings,
}

impl PaymentFlowController {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentRepository>,
        settings: GatewaySettings,
    ) -> Self {
        Self { gateway, bookings, payments, settings }
    }

    fn secret_key(&self) -> Result<&str, PaymentError> {
        self.settings
            .secret_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PaymentError::Configuration("Chapa secret key not set".to_string()))
    }

    /// Start a gateway transaction for a booking.
    ///
    /// A `Pending` payment row is written only when the gateway accepts the
    /// transaction. Returns the gateway's raw body.
    pub async fn initialize(&self, req: &InitializePaymentRequest) -> Result<Value, PaymentError> {
        let secret_key = self.secret_key()?;
        let booking_id = parse_booking_reference(req.booking_reference.as_ref())?;

        let details = self
            .bookings
            .get_booking_details(booking_id)
            .await
            .map_err(PaymentError::store)?
            .ok_or_else(|| PaymentError::Validation("Invalid booking reference".to_string()))?;

        let email = details.user.email.trim().to_string();
        if email.is_empty() {
            return Err(PaymentError::Validation("Valid email is required".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(PaymentError::Validation("Invalid email format".to_string()));
        }

        let first_name = prefer_own(
            &details.user.first_name,
            name_override("first_name", req.first_name.as_ref())?,
        );
        let last_name = prefer_own(
            &details.user.last_name,
            name_override("last_name", req.last_name.as_ref())?,
        );

        let amount = match req.amount.as_ref() {
            Some(raw) if !is_blank(raw) => parse_amount(raw)
                .ok_or_else(|| PaymentError::Validation("Invalid amount".to_string()))?,
            _ => details.listing.price_per_night,
        };

        let tx_ref = transaction_reference(details.booking.id, Utc::now());
        let payload = InitializeTransaction {
            amount,
            currency: CURRENCY.to_string(),
            email,
            first_name,
            last_name,
            tx_ref: tx_ref.clone(),
            callback_url: self.settings.callback_url.clone(),
        };

        info!(
            "Initializing payment {} for booking {} ({} {}, {})",
            tx_ref,
            booking_id,
            amount,
            CURRENCY,
            Masked(payload.email.clone()).email_hint()
        );

        let response = self.gateway.initialize(&payload, secret_key).await.map_err(|e| {
            error!("Payment gateway unreachable for {}: {}", tx_ref, e);
            PaymentError::from(e)
        })?;

        if response.is_http_ok() && response.reports_success() && response.has_data() {
            let new_payment = NewPayment {
                booking_reference: booking_id.to_string(),
                amount,
                transaction_id: tx_ref.clone(),
            };
            // No transaction spans the gateway call; a failure here leaves the
            // provider holding a transaction we have no row for.
            self.payments.create_payment(&new_payment).await.map_err(|e| {
                error!(
                    "Gateway accepted {} but the payment row was not saved, reconcile manually: {}",
                    tx_ref, e
                );
                PaymentError::store(e)
            })?;

            info!("Payment {} is Pending", tx_ref);
            return Ok(response.body);
        }

        warn!(
            "Gateway rejected {} (HTTP {}): {}",
            tx_ref, response.http_status, response.body
        );
        Err(PaymentError::GatewayRejected(response.body))
    }

    /// Ask the gateway how a transaction ended and record it.
    ///
    /// The gateway is called before the local lookup, so an unknown reference
    /// still costs one provider round trip.
    pub async fn verify(&self, tx_ref: &str) -> Result<Value, PaymentError> {
        let secret_key = self.secret_key()?;

        let response = self.gateway.verify(tx_ref, secret_key).await.map_err(|e| {
            error!("Payment gateway unreachable verifying {}: {}", tx_ref, e);
            PaymentError::from(e)
        })?;

        let mut payment = self
            .payments
            .get_payment_by_transaction(tx_ref)
            .await
            .map_err(PaymentError::store)?
            .ok_or_else(|| PaymentError::NotFound("Payment not found".to_string()))?;

        let succeeded = response.reports_success() && response.reports_settled_success();
        let previous = payment.status;
        payment.apply_verification(succeeded);

        self.payments
            .update_payment_status(tx_ref, payment.status)
            .await
            .map_err(PaymentError::store)?
            .ok_or_else(|| PaymentError::NotFound("Payment not found".to_string()))?;

        info!("Payment {} verified: {} -> {}", tx_ref, previous, payment.status);
        Ok(response.body)
    }
}

fn parse_booking_reference(raw: Option<&Value>) -> Result<i64, PaymentError> {
    let raw = match raw {
        Some(v) if !is_blank(v) => v,
        _ => return Err(PaymentError::Validation("booking_reference is required".to_string())),
    };

    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| PaymentError::Validation("Invalid booking reference".to_string()))
}

/// Null counts as absent; anything other than a string is rejected.
fn name_override<'a>(field: &str, raw: Option<&'a Value>) -> Result<Option<&'a str>, PaymentError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(PaymentError::Validation(format!("{} must be a string", field))),
    }
}

/// The account's own value wins; the request fills in only when it is empty.
fn prefer_own(own: &str, fallback: Option<&str>) -> String {
    if own.is_empty() {
        fallback.unwrap_or_default().to_string()
    } else {
        own.to_string()
    }
}
