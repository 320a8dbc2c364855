use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voyage_api::{app, mailer::LogMailer, worker, AppState, Repositories};
use voyage_core::notification::{EmailQueue, Mailer};
use voyage_payment::{ChapaClient, GatewaySettings, PaymentFlowController};
use voyage_store::app_config::{Config, QueueBackend, StorageBackend};
use voyage_store::{ChannelEmailQueue, DbClient, KafkaEmailQueue, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voyage_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Voyage API on port {}", config.server.port);

    let repos = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = DbClient::new(&config.database.url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            Repositories::postgres(db.pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Repositories::memory(MemoryStore::new())
        }
    };

    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
    let from_address = config.email.from_address.clone();

    let email_queue: Arc<dyn EmailQueue> = match config.queue.backend {
        QueueBackend::Kafka => {
            let queue = KafkaEmailQueue::new(&config.kafka.brokers, &config.kafka.email_topic)
                .context("Failed to create Kafka producer")?;
            let kafka = config.kafka.clone();
            tokio::spawn(async move {
                if let Err(e) = worker::start_email_worker(
                    kafka.brokers,
                    kafka.group_id,
                    kafka.email_topic,
                    mailer,
                    from_address,
                )
                .await
                {
                    tracing::error!("Email worker stopped: {}", e);
                }
            });
            Arc::new(queue)
        }
        QueueBackend::Memory => {
            let (queue, jobs) = ChannelEmailQueue::channel();
            tokio::spawn(worker::run_channel_worker(jobs, mailer, from_address));
            Arc::new(queue)
        }
    };

    if config.chapa.secret_key.is_none() {
        tracing::warn!("CHAPA_SECRET_KEY is not set; payment endpoints will answer 500");
    }
    let gateway = ChapaClient::new(
        &config.chapa.base_url,
        Duration::from_secs(config.chapa.timeout_seconds),
    )
    .context("Failed to build Chapa client")?;
    let payments = PaymentFlowController::new(
        Arc::new(gateway),
        repos.bookings.clone(),
        repos.payments.clone(),
        GatewaySettings {
            secret_key: config.chapa.secret_key.clone(),
            callback_url: config.chapa.callback_url.clone(),
        },
    );

    let app = app(AppState::new(repos, email_queue, payments), &config.cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
