use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use roost_domain::booking::{Booking, BookingStatus};
use roost_domain::events::{BookingEvent, HEADER_EVENT_TYPE, HEADER_OWNER_ID, HEADER_TRAVELER_ID};
use roost_domain::repository::EventPublisher;

/// Kafka-backed producer for booking lifecycle events. Constructed once at
/// process start and shared via the app state; it never mutates the booking
/// store itself.
#[derive(Clone)]
pub struct EventProducer {
    producer: FutureProducer,
}

impl EventProducer {
    pub fn new(brokers: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer })
    }

    async fn publish(
        &self,
        event: &BookingEvent,
        actor_header: &str,
        actor_id: Uuid,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let topic = event.topic();
        let key = event.key();
        let payload = serde_json::to_string(event)?;
        let actor = actor_id.to_string();

        let headers = OwnedHeaders::new()
            .insert(Header {
                key: HEADER_EVENT_TYPE,
                value: Some(event.event_type()),
            })
            .insert(Header {
                key: actor_header,
                value: Some(actor.as_str()),
            });

        let record = FutureRecord::to(topic)
            .key(&key)
            .payload(&payload)
            .headers(headers);

        match self
            .producer
            .send(record, Timeout::After(Duration::from_secs(0)))
            .await
        {
            Ok(delivery) => {
                info!(
                    "Sent {} to {}/{}: partition {} offset {}",
                    event.event_type(),
                    topic,
                    key,
                    delivery.partition,
                    delivery.offset
                );
                Ok(())
            }
            Err((e, _msg)) => {
                error!("Failed to send message to {}: {}", topic, e);
                Err(Box::new(e))
            }
        }
    }
}

#[async_trait]
impl EventPublisher for EventProducer {
    async fn publish_booking_request(
        &self,
        booking: &Booking,
        total_price: Option<f64>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let event = BookingEvent::RequestCreated {
            booking_id: booking.id,
            property_id: booking.property_id,
            traveler_id: booking.traveler_id,
            owner_id: booking.owner_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_price,
            status: booking.status,
            timestamp: chrono::Utc::now(),
        };

        self.publish(&event, HEADER_TRAVELER_ID, booking.traveler_id)
            .await
    }

    async fn publish_booking_update(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
        actor_id: Uuid,
        notes: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let event = BookingEvent::StatusUpdated {
            booking_id,
            status: status.to_string(),
            owner_id: actor_id,
            notes: notes.to_string(),
            timestamp: chrono::Utc::now(),
        };

        self.publish(&event, HEADER_OWNER_ID, actor_id).await
    }
}
