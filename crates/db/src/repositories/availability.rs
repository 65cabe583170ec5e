use crate::models::DbAvailability;
use chrono::Utc;
use clinicslot_core::models::availability::WeeklySchedule;
use eyre::Result;
use sqlx::{Pool, Postgres, types::Json};
use uuid::Uuid;

pub async fn get_availability_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAvailability>> {
    tracing::debug!("Getting availability by id: {}", id);

    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, workspace_id, provider_id, slot_duration_minutes, weekly_schedule, created_at, updated_at
        FROM availability_configs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}

pub async fn get_availability_by_provider(
    pool: &Pool<Postgres>,
    workspace_id: Uuid,
    provider_id: Uuid,
) -> Result<Option<DbAvailability>> {
    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, workspace_id, provider_id, slot_duration_minutes, weekly_schedule, created_at, updated_at
        FROM availability_configs
        WHERE workspace_id = $1 AND provider_id = $2
        "#,
    )
    .bind(workspace_id)
    .bind(provider_id)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}

/// Returns `None` when the provider already has a config.
pub async fn insert_availability(
    pool: &Pool<Postgres>,
    workspace_id: Uuid,
    provider_id: Uuid,
    slot_duration_minutes: i32,
    weekly_schedule: &WeeklySchedule,
) -> Result<Option<DbAvailability>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating availability: id={}, workspace={}, provider={}, duration={}",
        id, workspace_id, provider_id, slot_duration_minutes
    );

    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        INSERT INTO availability_configs
            (id, workspace_id, provider_id, slot_duration_minutes, weekly_schedule, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        ON CONFLICT (workspace_id, provider_id) DO NOTHING
        RETURNING id, workspace_id, provider_id, slot_duration_minutes, weekly_schedule, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(workspace_id)
    .bind(provider_id)
    .bind(slot_duration_minutes)
    .bind(Json(weekly_schedule))
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}

/// Single-statement replacement of duration and schedule.
pub async fn replace_availability(
    pool: &Pool<Postgres>,
    workspace_id: Uuid,
    provider_id: Uuid,
    slot_duration_minutes: i32,
    weekly_schedule: &WeeklySchedule,
) -> Result<Option<DbAvailability>> {
    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        UPDATE availability_configs
        SET slot_duration_minutes = $3, weekly_schedule = $4, updated_at = $5
        WHERE workspace_id = $1 AND provider_id = $2
        RETURNING id, workspace_id, provider_id, slot_duration_minutes, weekly_schedule, created_at, updated_at
        "#,
    )
    .bind(workspace_id)
    .bind(provider_id)
    .bind(slot_duration_minutes)
    .bind(Json(weekly_schedule))
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}
