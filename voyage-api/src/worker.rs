use std::sync::Arc;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use voyage_core::notification::{send_booking_confirmation_email, Mailer};
use voyage_shared::BookingConfirmationEmail;

/// Consumes confirmation-email jobs from Kafka until the process exits.
pub async fn start_email_worker(
    brokers: String,
    group_id: String,
    topic: String,
    mailer: Arc<dyn Mailer>,
    from_address: String,
) -> Result<(), KafkaError> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("group.id", &group_id)
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .create()?;

    consumer.subscribe(&[topic.as_str()])?;

    info!("Email worker started, listening to {}...", topic);

    loop {
        match consumer.recv().await {
            Err(e) => error!("Kafka error: {}", e),
            Ok(m) => match m.payload_view::<str>() {
                Some(Ok(payload)) => match serde_json::from_str::<BookingConfirmationEmail>(payload) {
                    Ok(job) => deliver(mailer.as_ref(), &from_address, &job).await,
                    Err(e) => warn!("Skipping malformed email job: {}", e),
                },
                Some(Err(e)) => error!("Error reading payload: {}", e),
                None => warn!("Skipping empty email job"),
            },
        }
    }
}

/// Drains the in-process queue; returns once every sender is dropped.
pub async fn run_channel_worker(
    mut jobs: mpsc::UnboundedReceiver<BookingConfirmationEmail>,
    mailer: Arc<dyn Mailer>,
    from_address: String,
) {
    info!("Email worker started on in-process queue");
    while let Some(job) = jobs.recv().await {
        deliver(mailer.as_ref(), &from_address, &job).await;
    }
    info!("Email queue closed, worker stopping");
}

/// Delivery failures are logged and dropped; there is no retry.
async fn deliver(mailer: &dyn Mailer, from_address: &str, job: &BookingConfirmationEmail) {
    match send_booking_confirmation_email(mailer, from_address, job).await {
        Ok(ack) => info!("{}", ack),
        Err(e) => error!("Confirmation email to {} failed: {}", job.recipient.email_hint(), e),
    }
}
