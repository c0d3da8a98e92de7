//! Opaline Server - Nail Salon Booking System
//!
//! A Rust REST API server for salon appointment scheduling.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opaline_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("opaline_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Opaline Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.booking.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Availability
        .route("/availability/slots", get(api::availability::list_slots))
        .route("/availability/days", get(api::availability::list_days))
        .route("/availability/grid", get(api::availability::day_grid))
        // Appointments
        .route("/appointments", post(api::appointments::create_appointment))
        .route("/appointments", get(api::appointments::list_appointments))
        .route("/appointments/overdue", get(api::appointments::list_overdue))
        .route("/appointments/:id", get(api::appointments::get_appointment))
        .route("/appointments/:id/cancel", post(api::appointments::cancel_appointment))
        .route("/appointments/:id/reschedule", post(api::appointments::reschedule_appointment))
        .route("/appointments/:id/complete", post(api::appointments::complete_appointment))
        .route("/appointments/:id/no-show", post(api::appointments::mark_no_show))
        // Payment collaborator
        .route("/payments/webhook", post(api::payments::payment_webhook))
        // Promotions
        .route("/promotions/validate", post(api::promotions::validate_promotion))
        // Schedules
        .route("/employees/:id/working-hours", get(api::schedules::list_working_hours))
        .route("/employees/:id/working-hours", put(api::schedules::upsert_working_hours))
        .route("/blocked-slots", get(api::schedules::list_blocked_slots))
        .route("/blocked-slots", post(api::schedules::create_blocked_slot))
        .route("/blocked-slots/:id", delete(api::schedules::delete_blocked_slot))
        // Catalog
        .route("/services", get(api::catalog::list_services))
        .route("/employees", get(api::catalog::list_employees))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
