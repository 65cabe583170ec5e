use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Needed for the workspace equality part of the overlap exclusion constraint
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create availability_configs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availability_configs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            workspace_id UUID NOT NULL,
            provider_id UUID NOT NULL,
            slot_duration_minutes INTEGER NOT NULL,
            weekly_schedule JSONB NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT availability_one_per_provider UNIQUE (workspace_id, provider_id),
            CONSTRAINT availability_positive_duration CHECK (slot_duration_minutes > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create patients table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            workspace_id UUID NOT NULL,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            phone VARCHAR(64) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table. Pending windows may not overlap within a
    // workspace; done and cancelled rows are exempt.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            workspace_id UUID NOT NULL,
            patient_id UUID NOT NULL REFERENCES patients(id),
            date_time_start TIMESTAMP NOT NULL,
            date_time_end TIMESTAMP NOT NULL,
            duration_minutes INTEGER NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (date_time_end > date_time_start),
            CONSTRAINT valid_status CHECK (status IN ('pending', 'done', 'cancelled')),
            CONSTRAINT no_overlapping_pending EXCLUDE USING gist (
                workspace_id WITH =,
                tsrange(date_time_start, date_time_end, '[)') WITH &&
            ) WHERE (status = 'pending')
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_patients_workspace_email ON patients(workspace_id, lower(email));",
        "CREATE INDEX IF NOT EXISTS idx_appointments_workspace_status ON appointments(workspace_id, status);",
        "CREATE INDEX IF NOT EXISTS idx_appointments_workspace_start ON appointments(workspace_id, date_time_start);",
        "CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id);",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
