use std::sync::Arc;

use axum::{body::to_bytes, http::StatusCode};
use axum_test::TestServer;
use clinicslot_api::{ApiState, build_router, middleware::error_handling::map_error};
use clinicslot_core::errors::BookingError;
use clinicslot_db::mock::repositories::MockBookingRepo;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

#[rstest]
#[case::not_found(BookingError::NotFound("Appointment".to_string()), StatusCode::NOT_FOUND)]
#[case::validation(BookingError::Validation("start".to_string()), StatusCode::BAD_REQUEST)]
#[case::conflict(BookingError::Conflict("slot taken".to_string()), StatusCode::CONFLICT)]
#[case::authentication(BookingError::Authentication("no session".to_string()), StatusCode::UNAUTHORIZED)]
#[case::authorization(BookingError::Authorization("other workspace".to_string()), StatusCode::FORBIDDEN)]
#[case::database(BookingError::Database(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(
    BookingError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_client_errors_carry_their_message() {
    let response = map_error(BookingError::Conflict("The slot at 10:00 is already booked".to_string()));
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body, json!({ "error": "Conflict: The slot at 10:00 is already booked" }));
}

#[tokio::test]
async fn test_server_errors_hide_storage_details() {
    let mut repo = MockBookingRepo::new();
    repo.expect_get_availability()
        .returning(|_| Err(eyre::eyre!("password authentication failed for user \"clinic\"")));

    let state = Arc::new(ApiState::new(Arc::new(repo)));
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server
        .get(&format!("/api/availability/{}/slots", Uuid::new_v4()))
        .add_query_param("date", "2025-03-03")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Internal server error" }));
}
