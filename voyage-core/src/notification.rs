use async_trait::async_trait;
use tracing::info;
use voyage_shared::BookingConfirmationEmail;

pub const EMAIL_SENT_ACK: &str = "Email sent successfully!";

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("failed to serialize email job: {0}")]
    Serialization(String),
    #[error("failed to enqueue email job: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to send email: {0}")]
pub struct MailError(pub String);

/// Fire-and-forget task queue for confirmation emails.
#[async_trait]
pub trait EmailQueue: Send + Sync {
    async fn enqueue(&self, job: BookingConfirmationEmail) -> Result<(), QueueError>;
}

/// Outbound email delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(
        &self,
        subject: &str,
        body: &str,
        from: &str,
        to: &[String],
    ) -> Result<(), MailError>;
}

/// Worker-side body of the confirmation email task.
pub async fn send_booking_confirmation_email(
    mailer: &dyn Mailer,
    from: &str,
    job: &BookingConfirmationEmail,
) -> Result<&'static str, MailError> {
    let recipients = vec![job.recipient.expose().clone()];
    mailer.send_mail(job.subject(), &job.body(), from, &recipients).await?;
    info!("Booking confirmation sent to {}", job.recipient.email_hint());
    Ok(EMAIL_SENT_ACK)
}
