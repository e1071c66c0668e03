use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use roost_domain::booking::{Booking, BookingStatus};

use crate::auth::{require_role, verify_token, AuthUser, ROLE_OWNER};
use crate::error::AppError;
use crate::state::AppState;
use crate::traveler::{publish_update, BookingResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/owner/bookings", get(list_bookings))
        .route("/api/owner/bookings/{id}/accept", post(accept_booking))
        .route("/api/owner/bookings/{id}/cancel", post(cancel_booking))
}

/// View incoming booking requests for your properties, newest first.
async fn list_bookings(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let user = verify_token(bearer.token(), &state.auth.secret)?;
    require_role(&user, ROLE_OWNER)?;

    let bookings = state.bookings.bookings_for_owner(user.id).await?;
    Ok(Json(bookings))
}

/// Accepting a booking changes its status to ACCEPTED and blocks the
/// property for the requested dates.
async fn accept_booking(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let user = verify_token(bearer.token(), &state.auth.secret)?;
    require_role(&user, ROLE_OWNER)?;

    decide_booking(
        &state,
        &user,
        id,
        BookingStatus::Accepted,
        "Booking accepted by owner",
    )
    .await
}

/// Cancelling a booking changes its status to CANCELLED and releases
/// the dates.
async fn cancel_booking(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let user = verify_token(bearer.token(), &state.auth.secret)?;
    require_role(&user, ROLE_OWNER)?;

    decide_booking(
        &state,
        &user,
        id,
        BookingStatus::Cancelled,
        "Booking cancelled by owner",
    )
    .await
}

/// The owner's decision on a booking request: an authorized, state-checked
/// store write followed by a fire-and-forget event publish. Authorization
/// only exists on this synchronous path; the consumer replays the event as
/// trusted input.
async fn decide_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: BookingStatus,
    notes: &str,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Not found or not your booking".to_string()))?;

    if booking.owner_id != user.id {
        return Err(AppError::NotFoundError(
            "Not found or not your booking".to_string(),
        ));
    }

    booking
        .status
        .transition(status)
        .map_err(|e| AppError::ConflictError(e.to_string()))?;

    state.bookings.set_status(booking.id, status).await?;

    publish_update(state, booking.id, status, user.id, notes).await;

    Ok(Json(BookingResponse {
        id: booking.id,
        status: status.to_string(),
    }))
}
