use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use clinicslot_core::models::appointment::{
    Appointment, AppointmentDetails, AppointmentStatus, UpdateStatusRequest,
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
pub struct AppointmentsQuery {
    pub status: Option<String>,
}

/// Lists the workspace's appointments with one status, `pending` unless asked
/// otherwise, earliest first.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    Provider(session): Provider,
    query: Result<Query<AppointmentsQuery>, QueryRejection>,
) -> Result<Json<Vec<AppointmentDetails>>, AppError> {
    let query = query_params(query)?;
    let status = match query.status.as_deref() {
        Some(raw) => raw.parse::<AppointmentStatus>()?,
        None => AppointmentStatus::Pending,
    };

    let appointments = state.bookings.list_appointments(session, status).await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Provider(session): Provider,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AppointmentDetails>, AppError> {
    let id = path_param(id)?;
    let appointment = state.bookings.get_appointment(session, id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    Provider(session): Provider,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Appointment>, AppError> {
    let id = path_param(id)?;
    let request = json_body(payload)?;
    let appointment = state.bookings.update_status(session, id, request.status).await?;
    Ok(Json(appointment))
}
