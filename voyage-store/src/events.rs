use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, error};
use voyage_core::notification::{EmailQueue, QueueError};
use voyage_shared::BookingConfirmationEmail;

/// Publishes confirmation-email jobs to a Kafka topic for the email worker.
#[derive(Clone)]
pub struct KafkaEmailQueue {
    producer: FutureProducer,
    topic: String,
}

impl KafkaEmailQueue {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer, topic: topic.to_string() })
    }

    async fn publish(&self, key: &str, payload: &str) -> Result<(), rdkafka::error::KafkaError> {
        let record = FutureRecord::to(&self.topic)
            .key(key)
            .payload(payload);

        match self.producer.send(record, Timeout::After(Duration::from_secs(0))).await {
            Ok(delivery) => {
                info!(
                    "Sent message to {}: partition {} offset {}",
                    self.topic, delivery.partition, delivery.offset
                );
                Ok(())
            }
            Err((e, _msg)) => {
                error!("Failed to send message to {}: {}", self.topic, e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl EmailQueue for KafkaEmailQueue {
    async fn enqueue(&self, job: BookingConfirmationEmail) -> Result<(), QueueError> {
        let payload = serde_json::to_string(&job)
            .map_err(|e| QueueError::Serialization(e.to_string()))?;
        let key = job.recipient.email_hint();

        self.publish(&key, &payload)
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))
    }
}

/// In-process queue for single-node runs; a worker task drains the receiver.
#[derive(Clone)]
pub struct ChannelEmailQueue {
    sender: mpsc::UnboundedSender<BookingConfirmationEmail>,
}

impl ChannelEmailQueue {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BookingConfirmationEmail>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EmailQueue for ChannelEmailQueue {
    async fn enqueue(&self, job: BookingConfirmationEmail) -> Result<(), QueueError> {
        self.sender
            .send(job)
            .map_err(|_| QueueError::Transport("email worker channel closed".to_string()))
    }
}
