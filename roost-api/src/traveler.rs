use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roost_domain::booking::{Booking, BookingStatus, NewBooking};

use crate::auth::{require_role, verify_token, ROLE_TRAVELER};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub property_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: i32,
    pub total_price: Option<f64>,
}

fn default_guests() -> i32 {
    1
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/traveler/bookings",
            post(create_booking).get(list_bookings),
        )
        .route("/api/traveler/bookings/{id}/cancel", post(cancel_booking))
}

/// Traveler creates a booking for selected dates/guests. A booking starts
/// in PENDING status until the owner responds.
async fn create_booking(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let user = verify_token(bearer.token(), &state.auth.secret)?;
    require_role(&user, ROLE_TRAVELER)?;

    if req.start_date >= req.end_date {
        return Err(AppError::ValidationError(
            "start_date must be before end_date".to_string(),
        ));
    }

    // Resolve the property's owner up front; it is denormalized onto the
    // booking row and embedded into the published event.
    let owner_id = state
        .bookings
        .property_owner(req.property_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Property not found".to_string()))?;

    let booking = state
        .bookings
        .create_booking(NewBooking {
            traveler_id: user.id,
            property_id: req.property_id,
            owner_id,
            start_date: req.start_date,
            end_date: req.end_date,
            guests: req.guests,
        })
        .await?;

    publish_request(&state, &booking, req.total_price).await;

    tracing::info!("Booking created: {}", booking.id);

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            id: booking.id,
            status: booking.status.to_string(),
        }),
    ))
}

/// Travelers can view their pending/accepted/cancelled bookings,
/// newest first.
async fn list_bookings(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let user = verify_token(bearer.token(), &state.auth.secret)?;
    require_role(&user, ROLE_TRAVELER)?;

    let bookings = state.bookings.bookings_for_traveler(user.id).await?;
    Ok(Json(bookings))
}

/// Traveler cancels their own booking.
async fn cancel_booking(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let user = verify_token(bearer.token(), &state.auth.secret)?;
    require_role(&user, ROLE_TRAVELER)?;

    let booking = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Not found or no permission".to_string()))?;

    if booking.traveler_id != user.id {
        return Err(AppError::NotFoundError(
            "Not found or no permission".to_string(),
        ));
    }

    booking
        .status
        .transition(BookingStatus::Cancelled)
        .map_err(|e| AppError::ConflictError(e.to_string()))?;

    state
        .bookings
        .set_status(booking.id, BookingStatus::Cancelled)
        .await?;

    publish_update(
        &state,
        booking.id,
        BookingStatus::Cancelled,
        user.id,
        "Booking cancelled by traveler",
    )
    .await;

    Ok(Json(BookingResponse {
        id: booking.id,
        status: BookingStatus::Cancelled.to_string(),
    }))
}

/// Fire-and-forget publish of a BOOKING_REQUEST_CREATED event. The booking
/// row is already committed; a publish failure is logged and swallowed so
/// the caller still sees success.
pub(crate) async fn publish_request(state: &AppState, booking: &Booking, total_price: Option<f64>) {
    match &state.events {
        Some(events) => {
            if let Err(e) = events.publish_booking_request(booking, total_price).await {
                tracing::error!("Failed to publish booking request {}: {}", booking.id, e);
            }
        }
        None => tracing::debug!(
            "Messaging disabled, skipping booking request event for {}",
            booking.id
        ),
    }
}

/// Fire-and-forget publish of a BOOKING_STATUS_UPDATED event.
pub(crate) async fn publish_update(
    state: &AppState,
    booking_id: Uuid,
    status: BookingStatus,
    actor_id: Uuid,
    notes: &str,
) {
    match &state.events {
        Some(events) => {
            if let Err(e) = events
                .publish_booking_update(booking_id, status, actor_id, notes)
                .await
            {
                tracing::error!("Failed to publish booking update {}: {}", booking_id, e);
            }
        }
        None => tracing::debug!(
            "Messaging disabled, skipping booking update event for {}",
            booking_id
        ),
    }
}
