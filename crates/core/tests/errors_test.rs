use std::error::Error;
use clinicslot_core::errors::{BookingError, BookingResult};

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Availability not found".to_string());
    let validation = BookingError::Validation("start: not a bookable slot".to_string());
    let conflict = BookingError::Conflict("Slot already booked".to_string());
    let authentication = BookingError::Authentication("Missing session".to_string());
    let authorization = BookingError::Authorization("Not authorized".to_string());
    let database = BookingError::Database(eyre::eyre!("Database connection failed"));
    let internal = BookingError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Availability not found"
    );
    assert_eq!(
        validation.to_string(),
        "Validation error: start: not a bookable slot"
    );
    assert_eq!(conflict.to_string(), "Conflict: Slot already booked");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Missing session"
    );
    assert_eq!(
        authorization.to_string(),
        "Authorization error: Not authorized"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_internal_error_keeps_source() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let booking_error = BookingError::Internal(Box::new(io_error));

    assert!(booking_error.source().is_some());
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::Conflict("taken".to_string()));
    assert!(matches!(result, Err(BookingError::Conflict(_))));
}

#[test]
fn test_eyre_report_converts_to_database_error() {
    fn fails() -> BookingResult<()> {
        let report: eyre::Result<()> = Err(eyre::eyre!("connection reset"));
        report?;
        Ok(())
    }

    let err = fails().unwrap_err();
    assert!(matches!(err, BookingError::Database(_)));
    assert!(err.to_string().contains("connection reset"));
}
