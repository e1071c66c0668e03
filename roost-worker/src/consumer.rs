use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use std::error::Error;
use tracing::{error, info};
use uuid::Uuid;

use roost_domain::booking::{BookingError, BookingStatus};
use roost_domain::events::{BookingEvent, TOPIC_BOOKING_REQUESTS, TOPIC_BOOKING_UPDATES};
use roost_domain::repository::BookingStore;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Malformed event payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Unexpected {event} event on topic {topic}")]
    UnexpectedEvent { topic: String, event: String },

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error(transparent)]
    Status(#[from] BookingError),

    #[error("Store error for booking {booking_id}: {source}")]
    Store {
        booking_id: Uuid,
        source: Box<dyn Error + Send + Sync>,
    },
}

pub fn build_consumer(
    brokers: &str,
    group_id: &str,
) -> Result<StreamConsumer, rdkafka::error::KafkaError> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .set("group.id", group_id)
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .create()?;

    consumer.subscribe(&[TOPIC_BOOKING_REQUESTS, TOPIC_BOOKING_UPDATES])?;

    Ok(consumer)
}

/// Single sequential processing loop: one message is fully handled,
/// including its store write, before the next is pulled. That is what turns
/// the broker's same-key-same-partition guarantee into in-order application
/// per booking. A failed message is logged and skipped; only broker-level
/// redelivery retries it.
pub async fn run(consumer: StreamConsumer, store: &dyn BookingStore) {
    info!("Booking worker started, listening for booking events...");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received, closing consumer...");
                break;
            }
            result = consumer.recv() => match result {
                Err(e) => error!("Kafka error: {}", e),
                Ok(m) => {
                    let topic = m.topic().to_string();
                    info!(
                        "Message received from {} partition {} offset {}",
                        topic,
                        m.partition(),
                        m.offset()
                    );

                    let payload = m.payload().unwrap_or_default();
                    if let Err(e) = handle_message(store, &topic, payload).await {
                        error!("Error processing message from {}: {}", topic, e);
                    }
                }
            }
        }
    }
}

/// Dispatch a delivered message by topic. Every handler is an idempotent
/// "set" against the booking store, so redelivered messages converge on the
/// same state instead of erroring.
pub async fn handle_message(
    store: &dyn BookingStore,
    topic: &str,
    payload: &[u8],
) -> Result<(), WorkerError> {
    match topic {
        TOPIC_BOOKING_REQUESTS => handle_booking_request(store, payload).await,
        TOPIC_BOOKING_UPDATES => handle_booking_update(store, payload).await,
        other => Err(WorkerError::UnknownTopic(other.to_string())),
    }
}

/// A traveler created a booking. The synchronous write path already stored
/// it as PENDING, so this is a no-op in the common case; it exists so the
/// store converges after a replay or a race with the HTTP process.
async fn handle_booking_request(
    store: &dyn BookingStore,
    payload: &[u8],
) -> Result<(), WorkerError> {
    let event: BookingEvent = serde_json::from_slice(payload)?;
    let BookingEvent::RequestCreated {
        booking_id,
        traveler_id,
        property_id,
        ..
    } = event
    else {
        return Err(WorkerError::UnexpectedEvent {
            topic: TOPIC_BOOKING_REQUESTS.to_string(),
            event: event.event_type().to_string(),
        });
    };

    info!(
        "Processing booking request {} (traveler {}, property {})",
        booking_id, traveler_id, property_id
    );

    store
        .set_status(booking_id, BookingStatus::Pending)
        .await
        .map_err(|source| WorkerError::Store { booking_id, source })?;

    Ok(())
}

/// An owner decided on a booking. Applies the event's status verbatim,
/// uppercased: a plain set with no transition check, so the last physically
/// applied write wins even when deliveries arrive stale.
async fn handle_booking_update(
    store: &dyn BookingStore,
    payload: &[u8],
) -> Result<(), WorkerError> {
    let event: BookingEvent = serde_json::from_slice(payload)?;
    let BookingEvent::StatusUpdated {
        booking_id,
        status,
        owner_id,
        notes,
        ..
    } = event
    else {
        return Err(WorkerError::UnexpectedEvent {
            topic: TOPIC_BOOKING_UPDATES.to_string(),
            event: event.event_type().to_string(),
        });
    };

    info!(
        "Processing booking update {} -> {} (owner {}, notes: {})",
        booking_id, status, owner_id, notes
    );

    let status: BookingStatus = status.parse()?;

    store
        .set_status(booking_id, status)
        .await
        .map_err(|source| WorkerError::Store { booking_id, source })?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
