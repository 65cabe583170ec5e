//! PostgreSQL-backed tests. They need a live database and are ignored by
//! default; run them with
//! `TEST_DATABASE_URL=postgres://... cargo test -p clinicslot-db -- --ignored`.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clinicslot_core::{
    booking::BookingService,
    errors::BookingError,
    models::{
        ProviderSession,
        appointment::{AppointmentStatus, CreateBookingRequest, NewAppointment},
        availability::{AvailabilityRequest, DaySchedule, WeeklySchedule},
        patient::PatientIdentity,
        time_slot::TimeWindow,
    },
    repository::BookingRepository,
};
use clinicslot_db::{PgBookingRepository, mock::create_test_pool};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 3)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

async fn setup() -> (Arc<PgBookingRepository>, BookingService, ProviderSession, Uuid) {
    let pool = create_test_pool().await.expect("Failed to connect to test database");
    let repo = Arc::new(PgBookingRepository::new(pool));
    let service = BookingService::new(repo.clone());

    // Fresh ids per test keep runs independent without truncating tables.
    let session = ProviderSession {
        workspace_id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
    };
    let availability = service
        .create_availability(
            session,
            AvailabilityRequest {
                slot_duration_minutes: 30,
                weekly_schedule: WeeklySchedule::uniform(DaySchedule::hours(
                    NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                )),
            },
        )
        .await
        .expect("Failed to create availability");

    (repo, service, session, availability.id)
}

fn booking(availability_id: Uuid, start: NaiveDateTime, email: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        availability_id,
        start,
        end: None,
        name: "Ada".to_string(),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        notes: None,
    }
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
#[ignore]
async fn test_pg_concurrent_reservations_for_one_slot() {
    let (repo, service, session, availability_id) = setup().await;
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        let request = booking(availability_id, at(10, 0), &format!("p{}@example.com", i));
        handles.push(tokio::spawn(async move { service.reserve(request).await }));
    }

    let mut booked = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => booked += 1,
            Err(BookingError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(booked, 1);

    let windows = repo
        .list_booked_windows(session.workspace_id, TimeWindow::new(at(0, 0), at(23, 59)))
        .await
        .unwrap();
    assert_eq!(windows, vec![TimeWindow::new(at(10, 0), at(10, 30))]);

    let patients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE workspace_id = $1")
        .bind(session.workspace_id)
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(patients, 1);
}

#[tokio::test]
#[ignore]
async fn test_pg_exclusion_constraint_backs_up_the_check() {
    let (repo, service, session, availability_id) = setup().await;
    let first = service
        .reserve(booking(availability_id, at(9, 0), "ada@example.com"))
        .await
        .unwrap();

    // A raw insert that skips the advisory lock still cannot overlap.
    let result = sqlx::query(
        r#"
        INSERT INTO appointments (workspace_id, patient_id, date_time_start, date_time_end, duration_minutes, status)
        VALUES ($1, $2, $3, $4, 30, 'pending')
        "#,
    )
    .bind(session.workspace_id)
    .bind(first.patient_id)
    .bind(at(9, 15))
    .bind(at(9, 45))
    .execute(repo.pool())
    .await;

    let err = result.expect_err("overlapping pending insert must fail");
    let code = err.as_database_error().and_then(|e| e.code()).map(|c| c.into_owned());
    assert_eq!(code.as_deref(), Some("23P01"));
}

#[tokio::test]
#[ignore]
async fn test_pg_patient_is_reused_across_email_casing() {
    let (_repo, service, session, availability_id) = setup().await;

    let first = service
        .reserve(booking(availability_id, at(9, 0), "ada@example.com"))
        .await
        .unwrap();
    let mut shouting = booking(availability_id, at(9, 30), "Ada@Example.com");
    shouting.name = "ADA".to_string();
    shouting.phone = "555-0199".to_string();
    let second = service.reserve(shouting).await.unwrap();

    assert_eq!(first.patient_id, second.patient_id);
    let details = service.get_appointment(session, second.id).await.unwrap();
    assert_eq!(details.patient.name, "Ada");
    assert_eq!(details.patient.phone, "555-0100");
}

#[tokio::test]
#[ignore]
async fn test_pg_rejected_insert_leaves_no_patient() {
    let (repo, service, session, availability_id) = setup().await;
    service
        .reserve(booking(availability_id, at(10, 0), "winner@example.com"))
        .await
        .unwrap();

    let rejected = repo
        .insert_appointment_if_free(NewAppointment {
            workspace_id: session.workspace_id,
            patient: PatientIdentity::new("Loser", "loser@example.com", "555-0100"),
            window: TimeWindow::new(at(10, 0), at(10, 30)),
            duration_minutes: 30,
            notes: None,
        })
        .await
        .unwrap();
    assert!(rejected.is_none());

    let patients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE workspace_id = $1")
        .bind(session.workspace_id)
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(patients, 1);
}

#[tokio::test]
#[ignore]
async fn test_pg_status_update_is_compare_and_set() {
    let (repo, service, session, availability_id) = setup().await;
    let appointment = service
        .reserve(booking(availability_id, at(11, 0), "ada@example.com"))
        .await
        .unwrap();

    let done = repo
        .update_appointment_status(
            session.workspace_id,
            appointment.id,
            AppointmentStatus::Pending,
            AppointmentStatus::Done,
        )
        .await
        .unwrap();
    assert_eq!(done.map(|a| a.status), Some(AppointmentStatus::Done));

    let stale = repo
        .update_appointment_status(
            session.workspace_id,
            appointment.id,
            AppointmentStatus::Pending,
            AppointmentStatus::Cancelled,
        )
        .await
        .unwrap();
    assert!(stale.is_none());

    let details = service.get_appointment(session, appointment.id).await.unwrap();
    assert_eq!(details.appointment.status, AppointmentStatus::Done);
    assert_eq!(details.patient.email, "ada@example.com");
}
