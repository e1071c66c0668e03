use std::sync::Arc;

use roost_domain::repository::{BookingStore, EventPublisher};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingStore>,
    /// None when the event channel was unreachable at startup; booking CRUD
    /// keeps working without messaging for this process's lifetime.
    pub events: Option<Arc<dyn EventPublisher>>,
    pub auth: AuthConfig,
}
