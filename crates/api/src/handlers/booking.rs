use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use clinicslot_core::models::appointment::{CreateBookingRequest, CreateBookingResponse};
use std::sync::Arc;

use crate::{ApiState, handlers::json_body, middleware::error_handling::AppError};

/// Books one slot for a patient.
///
/// A taken slot answers 409 and the client is expected to re-query the day's
/// slots; retrying the same body will keep failing.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let request = json_body(payload)?;
    let appointment = state.bookings.reserve(request).await?;
    Ok((StatusCode::CREATED, Json(CreateBookingResponse { appointment })))
}
