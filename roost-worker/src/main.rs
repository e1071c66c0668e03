use roost_store::{DbClient, StoreBookingRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod consumer;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roost_worker=info,rdkafka=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = roost_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!(
        "Starting Roost worker (group {}) against {}",
        config.kafka.group_id,
        config.kafka.brokers
    );

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    let store = StoreBookingRepository::new(db.pool.clone());

    let kafka_consumer = consumer::build_consumer(&config.kafka.brokers, &config.kafka.group_id)
        .expect("Consumer creation failed");

    consumer::run(kafka_consumer, &store).await;

    tracing::info!("Worker stopped.");
}
