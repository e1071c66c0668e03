use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub traveler_id: Uuid,
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a booking. The store assigns the id and timestamps;
/// the owner is resolved from the property at create time.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub traveler_id: Uuid,
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Cancelled,
}

impl BookingStatus {
    /// Whether the synchronous write path may move a booking from `self`
    /// to `next`. Accept is only valid from Pending; cancel is valid from
    /// Pending or Accepted; nothing leaves Cancelled.
    pub fn can_become(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Accepted)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Accepted, BookingStatus::Cancelled)
        )
    }

    pub fn transition(self, next: BookingStatus) -> Result<BookingStatus, BookingError> {
        if self.can_become(next) {
            Ok(next)
        } else {
            Err(BookingError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Accepted => "ACCEPTED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    // Case-insensitive: the original system mixed lowercase statuses into
    // event payloads and uppercased them at the consumer boundary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "ACCEPTED" => Ok(BookingStatus::Accepted),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            _ => Err(BookingError::UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_only_from_pending() {
        assert!(BookingStatus::Pending.can_become(BookingStatus::Accepted));
        assert!(!BookingStatus::Accepted.can_become(BookingStatus::Accepted));
        assert!(!BookingStatus::Cancelled.can_become(BookingStatus::Accepted));
    }

    #[test]
    fn test_cancel_from_pending_or_accepted() {
        assert!(BookingStatus::Pending.can_become(BookingStatus::Cancelled));
        assert!(BookingStatus::Accepted.can_become(BookingStatus::Cancelled));
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(!BookingStatus::Cancelled.can_become(BookingStatus::Pending));
        assert!(!BookingStatus::Cancelled.can_become(BookingStatus::Accepted));
        assert!(!BookingStatus::Cancelled.can_become(BookingStatus::Cancelled));
    }

    #[test]
    fn test_invalid_transition_error() {
        let result = BookingStatus::Cancelled.transition(BookingStatus::Accepted);
        assert!(matches!(
            result,
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            "accepted".parse::<BookingStatus>().unwrap(),
            BookingStatus::Accepted
        );
        assert_eq!(
            "PENDING".parse::<BookingStatus>().unwrap(),
            BookingStatus::Pending
        );
        assert!("REJECTED".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&BookingStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }
}
