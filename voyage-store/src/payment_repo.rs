use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use voyage_core::payment::{NewPayment, Payment, PaymentStatus};
use voyage_core::repository::{PaymentRepository, RepoError};

pub struct StorePaymentRepository {
    pool: PgPool,
}

impl StorePaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    booking_reference: String,
    amount: Decimal,
    transaction_id: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepoError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            booking_reference: row.booking_reference,
            amount: row.amount,
            transaction_id: row.transaction_id,
            status: row.status.parse::<PaymentStatus>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PAYMENT_COLUMNS: &str =
    "id, booking_reference, amount, transaction_id, status, created_at, updated_at";

#[async_trait]
impl PaymentRepository for StorePaymentRepository {
    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, RepoError> {
        let sql = format!(
            "INSERT INTO payments (booking_reference, amount, transaction_id, status) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PAYMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(&payment.booking_reference)
            .bind(payment.amount)
            .bind(&payment.transaction_id)
            .bind(PaymentStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn get_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, RepoError> {
        let sql = format!("SELECT {} FROM payments WHERE transaction_id = $1", PAYMENT_COLUMNS);
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Payment::try_from).transpose()
    }

    async fn update_payment_status(
        &self,
        transaction_id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, RepoError> {
        let sql = format!(
            "UPDATE payments SET status = $2, updated_at = NOW() \
             WHERE transaction_id = $1 RETURNING {}",
            PAYMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(transaction_id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Payment::try_from).transpose()
    }

    async fn list_payments_for_booking(
        &self,
        booking_reference: &str,
    ) -> Result<Vec<Payment>, RepoError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE booking_reference = $1 ORDER BY id",
            PAYMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(booking_reference)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}
