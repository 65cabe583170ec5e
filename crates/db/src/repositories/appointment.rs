use crate::models::{DbAppointment, DbAppointmentWithPatient};
use crate::repositories::patient::find_or_create_patient;
use chrono::{NaiveDateTime, Utc};
use clinicslot_core::models::{appointment::NewAppointment, time_slot::TimeWindow};
use eyre::Result;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

/// Exclusion (`23P01`) and unique (`23505`) violations both mean another
/// pending appointment already holds the window.
fn is_window_taken(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(db_err.code().as_deref(), Some("23P01") | Some("23505")),
        _ => false,
    }
}

#[derive(Debug, FromRow)]
struct DbWindow {
    date_time_start: NaiveDateTime,
    date_time_end: NaiveDateTime,
}

/// Pending windows intersecting `range` under half-open overlap.
pub async fn list_booked_windows(
    pool: &Pool<Postgres>,
    workspace_id: Uuid,
    range: TimeWindow,
) -> Result<Vec<TimeWindow>> {
    let windows = sqlx::query_as::<_, DbWindow>(
        r#"
        SELECT date_time_start, date_time_end
        FROM appointments
        WHERE workspace_id = $1
          AND status = 'pending'
          AND date_time_start < $3
          AND date_time_end > $2
        ORDER BY date_time_start ASC
        "#,
    )
    .bind(workspace_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await?;

    Ok(windows
        .into_iter()
        .map(|w| TimeWindow::new(w.date_time_start, w.date_time_end))
        .collect())
}

/// Check, patient find-or-create and insert inside one transaction.
///
/// A transaction-scoped advisory lock serializes writers per workspace, and
/// the `no_overlapping_pending` exclusion constraint backs it up for any
/// writer that bypasses this function. The patient is only upserted once the
/// window is known to be free, and a rejected insert rolls it back.
pub async fn insert_appointment_if_free(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<Option<DbAppointment>> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(appointment.workspace_id)
        .execute(&mut *tx)
        .await?;

    let taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM appointments
            WHERE workspace_id = $1
              AND status = 'pending'
              AND date_time_start < $3
              AND date_time_end > $2
        )
        "#,
    )
    .bind(appointment.workspace_id)
    .bind(appointment.window.start)
    .bind(appointment.window.end)
    .fetch_one(&mut *tx)
    .await?;

    if taken {
        tracing::debug!(
            "Window {} - {} already taken in workspace {}",
            appointment.window.start, appointment.window.end, appointment.workspace_id
        );
        tx.rollback().await?;
        return Ok(None);
    }

    let patient = find_or_create_patient(&mut *tx, appointment.workspace_id, &appointment.patient).await?;

    let now = Utc::now();
    let inserted = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments
            (id, workspace_id, patient_id, date_time_start, date_time_end, duration_minutes, status, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $8)
        RETURNING id, workspace_id, patient_id, date_time_start, date_time_end, duration_minutes, status, notes, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(appointment.workspace_id)
    .bind(patient.id)
    .bind(appointment.window.start)
    .bind(appointment.window.end)
    .bind(appointment.duration_minutes)
    .bind(appointment.notes.as_deref())
    .bind(now)
    .fetch_one(&mut *tx)
    .await;

    let row = match inserted {
        Ok(row) => row,
        Err(err) if is_window_taken(&err) => {
            // Dropping the transaction rolls back the patient upsert too.
            tracing::debug!("Insert rejected by overlap constraint: {}", err);
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    tx.commit().await?;
    Ok(Some(row))
}

pub async fn get_appointment_with_patient(
    pool: &Pool<Postgres>,
    workspace_id: Uuid,
    id: Uuid,
) -> Result<Option<DbAppointmentWithPatient>> {
    let appointment = sqlx::query_as::<_, DbAppointmentWithPatient>(
        r#"
        SELECT a.id, a.workspace_id, a.patient_id, a.date_time_start, a.date_time_end,
               a.duration_minutes, a.status, a.notes, a.created_at, a.updated_at,
               p.name AS patient_name, p.email AS patient_email, p.phone AS patient_phone,
               p.created_at AS patient_created_at
        FROM appointments a
        JOIN patients p ON p.id = a.patient_id
        WHERE a.id = $1 AND a.workspace_id = $2
        "#,
    )
    .bind(id)
    .bind(workspace_id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn list_appointments_with_patient(
    pool: &Pool<Postgres>,
    workspace_id: Uuid,
    status: &str,
) -> Result<Vec<DbAppointmentWithPatient>> {
    let appointments = sqlx::query_as::<_, DbAppointmentWithPatient>(
        r#"
        SELECT a.id, a.workspace_id, a.patient_id, a.date_time_start, a.date_time_end,
               a.duration_minutes, a.status, a.notes, a.created_at, a.updated_at,
               p.name AS patient_name, p.email AS patient_email, p.phone AS patient_phone,
               p.created_at AS patient_created_at
        FROM appointments a
        JOIN patients p ON p.id = a.patient_id
        WHERE a.workspace_id = $1 AND a.status = $2
        ORDER BY a.date_time_start ASC
        "#,
    )
    .bind(workspace_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Compare-and-set on status; `None` when the row is missing or has moved on.
pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    workspace_id: Uuid,
    id: Uuid,
    from: &str,
    to: &str,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $4, updated_at = $5
        WHERE id = $1 AND workspace_id = $2 AND status = $3
        RETURNING id, workspace_id, patient_id, date_time_start, date_time_end, duration_minutes, status, notes, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(workspace_id)
    .bind(from)
    .bind(to)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}
