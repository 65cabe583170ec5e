//! # Availability Handlers
//!
//! The public slot query plus the provider's own availability config.
//!
//! ## Slot query
//!
//! `GET /api/availability/:id/slots?date=YYYY-MM-DD` regenerates the slots for
//! that day from the weekly schedule and marks each one against the pending
//! appointments of the workspace. Without a `date` the server's local date is
//! used. Times are wall-clock times of the provider; no time-zone conversion
//! happens anywhere in the API.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{Local, NaiveDate};
use clinicslot_core::{
    errors::BookingError,
    models::{
        QuerySlotsResponse,
        availability::{AvailabilityConfig, AvailabilityRequest},
    },
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::{json_body, path_param, query_params},
    middleware::{auth::Provider, error_handling::AppError},
};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// Calendar date as `YYYY-MM-DD`
    pub date: Option<String>,
}

impl SlotsQuery {
    fn date_or_today(&self) -> Result<NaiveDate, BookingError> {
        match self.date.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| BookingError::Validation(format!("date: expected YYYY-MM-DD, got {:?}", raw))),
            None => Ok(Local::now().date_naive()),
        }
    }
}

#[axum::debug_handler]
pub async fn query_slots(
    State(state): State<Arc<ApiState>>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<Json<QuerySlotsResponse>, AppError> {
    let id = path_param(id)?;
    let date = query_params(query)?.date_or_today()?;
    let response = state.bookings.query_slots(id, date).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Provider(session): Provider,
) -> Result<Json<AvailabilityConfig>, AppError> {
    let config = state.bookings.provider_availability(session).await?;
    Ok(Json(config))
}

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<ApiState>>,
    Provider(session): Provider,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AvailabilityConfig>), AppError> {
    let request = json_body(payload)?;
    let config = state.bookings.create_availability(session, request).await?;
    Ok((StatusCode::CREATED, Json(config)))
}

#[axum::debug_handler]
pub async fn replace_availability(
    State(state): State<Arc<ApiState>>,
    Provider(session): Provider,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<AvailabilityConfig>, AppError> {
    let request = json_body(payload)?;
    let config = state.bookings.replace_availability(session, request).await?;
    Ok(Json(config))
}
