//! # brightbook API
//!
//! Web server for the cleaning-services booking dashboard. It exposes the
//! reference-data CRUD screens, customer lookup, the multi-step booking
//! wizard and the weekly team roster.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into wizard intents and backend calls
//! - **Sessions**: Hold one booking wizard per open dashboard form
//! - **Middleware**: Map domain errors to HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! Workflow logic lives in `brightbook-core`; this crate only drives it.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Wizard session store and expiry sweeper
pub mod sessions;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{HeaderValue, StatusCode},
    BoxError, Router,
};
use brightbook_core::backend::BookingBackend;
use brightbook_db::PgBackend;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use sessions::SessionStore;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for the reference-data screens
    pub db_pool: PgPool,
    /// Backend the wizard, customer lookup and roster go through
    pub backend: Arc<dyn BookingBackend>,
    /// Open booking wizards
    pub sessions: SessionStore,
    /// Hold window given to new wizard sessions
    pub hold_seconds: u32,
}

impl ApiState {
    pub fn new(db_pool: PgPool, backend: Arc<dyn BookingBackend>, hold_seconds: u32) -> Self {
        Self {
            db_pool,
            backend,
            sessions: SessionStore::new(),
            hold_seconds,
        }
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Areas, districts, properties, residence types and services
        .merge(routes::reference::routes())
        // Customer lookup and creation
        .merge(routes::customer::routes())
        // Booking wizard sessions
        .merge(routes::wizard::routes())
        // Weekly roster and teams
        .merge(routes::roster::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> tower_http::cors::CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    tower_http::cors::CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and database connection
///
/// Sets up logging, the PostgreSQL backend, the expiry sweeper and all
/// routes, then serves until the process stops.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = brightbook_api::config::ApiConfig::from_env()?;
/// let db_pool = brightbook_db::create_pool(&config.database_url).await?;
/// brightbook_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let backend = PgBackend::new(db_pool.clone()).with_hold_seconds(config.hold_seconds);
    let state = Arc::new(ApiState::new(db_pool, Arc::new(backend), config.hold_seconds));

    sessions::spawn_expiry_sweeper(
        state.clone(),
        Duration::from_secs(config.expiry_sweep_interval),
        Duration::from_secs(config.session_idle_ttl),
    );

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        app.layer(cors_layer(origins))
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async { StatusCode::REQUEST_TIMEOUT }))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
