pub mod appointment;
pub mod availability;
pub mod booking;

use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use clinicslot_core::errors::BookingError;

use crate::middleware::error_handling::AppError;

// Extractor rejections are turned into the API's own validation error shape
// instead of axum's plain-text bodies.

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError(BookingError::Validation(rejection.body_text())))
}

pub(crate) fn path_param<T>(path: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    path.map(|Path(value)| value)
        .map_err(|rejection| AppError(BookingError::Validation(rejection.body_text())))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError(BookingError::Validation(rejection.body_text())))
}
