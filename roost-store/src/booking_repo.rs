use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::error::Error;
use uuid::Uuid;

use roost_domain::booking::{Booking, BookingStatus, NewBooking};
use roost_domain::repository::BookingStore;

pub struct StoreBookingRepository {
    pool: PgPool,
}

impl StoreBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    traveler_id: Uuid,
    property_id: Uuid,
    owner_id: Uuid,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    guests: i32,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, Box<dyn Error + Send + Sync>> {
        Ok(Booking {
            id: self.id,
            traveler_id: self.traveler_id,
            property_id: self.property_id,
            owner_id: self.owner_id,
            start_date: self.start_date,
            end_date: self.end_date,
            guests: self.guests,
            status: self.status.parse::<BookingStatus>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_BOOKING: &str = "SELECT id, traveler_id, property_id, owner_id, start_date, end_date, guests, status, created_at, updated_at FROM bookings";

#[async_trait]
impl BookingStore for StoreBookingRepository {
    async fn create_booking(
        &self,
        new: NewBooking,
    ) -> Result<Booking, Box<dyn Error + Send + Sync>> {
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            traveler_id: new.traveler_id,
            property_id: new.property_id,
            owner_id: new.owner_id,
            start_date: new.start_date,
            end_date: new.end_date,
            guests: new.guests,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO bookings (id, traveler_id, property_id, owner_id, start_date, end_date, guests, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(booking.id)
        .bind(booking.traveler_id)
        .bind(booking.property_id)
        .bind(booking.owner_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.guests)
        .bind(booking.status.to_string())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{} WHERE id = $1", SELECT_BOOKING))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        sqlx::query("UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn bookings_for_traveler(
        &self,
        traveler_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE traveler_id = $1 ORDER BY created_at DESC",
            SELECT_BOOKING
        ))
        .bind(traveler_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn bookings_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE owner_id = $1 ORDER BY created_at DESC",
            SELECT_BOOKING
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn property_owner(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Uuid>, Box<dyn Error + Send + Sync>> {
        let owner: Option<(Uuid,)> =
            sqlx::query_as("SELECT owner_id FROM properties WHERE id = $1")
                .bind(property_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(owner.map(|(id,)| id))
    }
}
