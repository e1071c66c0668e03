pub mod booking;
pub mod events;
pub mod repository;

pub use booking::{Booking, BookingError, BookingStatus, NewBooking};
pub use events::BookingEvent;
pub use repository::{BookingStore, EventPublisher};
