//! # ClinicSlot API
//!
//! The HTTP surface of the booking engine: the public slot query and
//! booking endpoints, and the provider endpoints for availability and
//! appointment management.
//!
//! ## Architecture
//!
//! - **Routes**: URL structure, one module per resource
//! - **Handlers**: Extract input, call [`BookingService`], shape the response
//! - **Middleware**: Provider session extraction and error-to-HTTP mapping
//! - **Config**: Environment configuration
//!
//! Handlers never talk to storage directly; everything goes through the
//! service, which owns validation, slot checks and the atomic reservation.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
};
use clinicslot_core::{booking::BookingService, repository::BookingRepository};
use clinicslot_db::{DbPool, PgBookingRepository};
use eyre::Result;
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::middleware::auth::{PROVIDER_HEADER, WORKSPACE_HEADER};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub bookings: BookingService,
}

impl ApiState {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self {
            bookings: BookingService::new(repo),
        }
    }
}

/// Builds the application router with every route and request tracing.
///
/// Server-level layers (CORS, timeout) are added by [`start_server`], so
/// tests can drive this router directly.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::availability::routes())
        .merge(routes::booking::routes())
        .merge(routes::appointment::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server backed by PostgreSQL
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = clinicslot_api::config::ApiConfig::from_env()?;
/// let pool = clinicslot_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// clinicslot_api::start_server(config, pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(Arc::new(PgBookingRepository::new(db_pool))));
    let app = build_router(state);

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(WORKSPACE_HEADER),
            HeaderName::from_static(PROVIDER_HEADER),
        ])
        .allow_origin(allowed)
        .allow_credentials(true)
}

async fn handle_timeout(err: BoxError) -> impl IntoResponse {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, Json(json!({ "error": "Request timed out" })))
    } else {
        warn!("Unhandled middleware error: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
    }
}
