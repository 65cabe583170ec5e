use crate::models::DbPatient;
use chrono::Utc;
use clinicslot_core::models::patient::PatientIdentity;
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Find-or-create in one statement against the `(workspace_id, lower(email))`
/// unique index. The no-op update lets `RETURNING` yield the existing row,
/// which is otherwise left untouched.
///
/// Runs on the caller's executor so the reservation transaction can roll the
/// patient back together with a rejected appointment.
pub async fn find_or_create_patient(
    executor: impl PgExecutor<'_>,
    workspace_id: Uuid,
    identity: &PatientIdentity,
) -> Result<DbPatient> {
    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        INSERT INTO patients (id, workspace_id, name, email, phone, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (workspace_id, (lower(email)))
        DO UPDATE SET email = patients.email
        RETURNING id, workspace_id, name, email, phone, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(workspace_id)
    .bind(&identity.name)
    .bind(&identity.email)
    .bind(&identity.phone)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    tracing::debug!("Resolved patient {} in workspace {}", patient.id, workspace_id);
    Ok(patient)
}
