use async_trait::async_trait;
use std::error::Error;
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus, NewBooking};

/// Durable record of bookings. The store exclusively owns the record; the
/// event channel only carries transient copies of facts about it. Both the
/// HTTP process and the consumer worker write through this trait with no
/// cross-process coordination (each call is an independently committed
/// mutation).
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_booking(
        &self,
        new: NewBooking,
    ) -> Result<Booking, Box<dyn Error + Send + Sync>>;

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn Error + Send + Sync>>;

    /// Plain set, naturally idempotent. Last physical write wins.
    async fn set_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn bookings_for_traveler(
        &self,
        traveler_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>>;

    async fn bookings_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>>;

    async fn property_owner(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Uuid>, Box<dyn Error + Send + Sync>>;
}

/// Publisher side of the booking event pipeline. Callers on the HTTP path
/// treat failures as fire-and-forget: log at the boundary, never roll back
/// the committed store write, never surface the failure to the client.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_booking_request(
        &self,
        booking: &Booking,
        total_price: Option<f64>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn publish_booking_update(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
        actor_id: Uuid,
        notes: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
