use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::BookingStatus;

/// Traveler -> system: new booking requests.
pub const TOPIC_BOOKING_REQUESTS: &str = "booking-requests";
/// Owner decision -> system: status changes.
pub const TOPIC_BOOKING_UPDATES: &str = "booking-updates";
/// Reserved for downstream notification fan-out; nothing consumes it yet.
pub const TOPIC_TRAVELER_NOTIFICATIONS: &str = "traveler-notifications";

/// Transport header carrying the event-type discriminator.
pub const HEADER_EVENT_TYPE: &str = "event-type";
pub const HEADER_TRAVELER_ID: &str = "traveler-id";
pub const HEADER_OWNER_ID: &str = "owner-id";

/// A booking lifecycle fact in transit. Immutable once published; keyed by
/// the booking id so all events for one booking land in the same partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum BookingEvent {
    #[serde(rename = "BOOKING_REQUEST_CREATED")]
    RequestCreated {
        booking_id: Uuid,
        property_id: Uuid,
        traveler_id: Uuid,
        owner_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_price: Option<f64>,
        status: BookingStatus,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "BOOKING_STATUS_UPDATED")]
    StatusUpdated {
        booking_id: Uuid,
        /// Raw status string; the consumer uppercases it before applying.
        status: String,
        owner_id: Uuid,
        notes: String,
        timestamp: DateTime<Utc>,
    },
}

impl BookingEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            BookingEvent::RequestCreated { .. } => TOPIC_BOOKING_REQUESTS,
            BookingEvent::StatusUpdated { .. } => TOPIC_BOOKING_UPDATES,
        }
    }

    /// Partition key: the booking id's string form.
    pub fn key(&self) -> String {
        self.booking_id().to_string()
    }

    pub fn booking_id(&self) -> Uuid {
        match self {
            BookingEvent::RequestCreated { booking_id, .. } => *booking_id,
            BookingEvent::StatusUpdated { booking_id, .. } => *booking_id,
        }
    }

    /// Value of the `event-type` transport header.
    pub fn event_type(&self) -> &'static str {
        match self {
            BookingEvent::RequestCreated { .. } => "BOOKING_REQUEST",
            BookingEvent::StatusUpdated { .. } => "BOOKING_UPDATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_update() -> BookingEvent {
        BookingEvent::StatusUpdated {
            booking_id: Uuid::new_v4(),
            status: "ACCEPTED".to_string(),
            owner_id: Uuid::new_v4(),
            notes: "Booking accepted by owner".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_event_discriminator_field() {
        let json = serde_json::to_value(sample_update()).unwrap();
        assert_eq!(json["event"], "BOOKING_STATUS_UPDATED");
        assert_eq!(json["status"], "ACCEPTED");
        assert_eq!(json["notes"], "Booking accepted by owner");
    }

    #[test]
    fn test_event_routing() {
        let event = sample_update();
        assert_eq!(event.topic(), TOPIC_BOOKING_UPDATES);
        assert_eq!(event.key(), event.booking_id().to_string());
        assert_eq!(event.event_type(), "BOOKING_UPDATE");
    }

    #[test]
    fn test_request_created_round_trip() {
        let event = BookingEvent::RequestCreated {
            booking_id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            traveler_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            total_price: Some(420.0),
            status: BookingStatus::Pending,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let parsed: BookingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.booking_id(), event.booking_id());
        assert_eq!(parsed.topic(), TOPIC_BOOKING_REQUESTS);
    }

    #[test]
    fn test_unknown_event_rejected() {
        let json = r#"{"event":"BOOKING_DELETED","booking_id":"not-real"}"#;
        assert!(serde_json::from_str::<BookingEvent>(json).is_err());
    }
}
