use std::net::SocketAddr;
use std::sync::Arc;

use roost_api::{
    app,
    state::{AppState, AuthConfig},
};
use roost_domain::repository::{BookingStore, EventPublisher};
use roost_store::{DbClient, EventProducer, StoreBookingRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roost_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = roost_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Roost API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let bookings: Arc<dyn BookingStore> = Arc::new(StoreBookingRepository::new(db.pool.clone()));

    // Booking CRUD must keep working even when the event channel is down;
    // in that case the process runs without messaging until restart.
    let events: Option<Arc<dyn EventPublisher>> = match EventProducer::new(&config.kafka.brokers) {
        Ok(producer) => Some(Arc::new(producer)),
        Err(e) => {
            tracing::error!("Failed to create Kafka producer: {}. Continuing without messaging.", e);
            None
        }
    };

    let app_state = AppState {
        bookings,
        events,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
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

    tracing::info!("Shutdown signal received, closing API...");
}
