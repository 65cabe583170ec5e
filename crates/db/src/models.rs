use chrono::{DateTime, NaiveDateTime, Utc};
use clinicslot_core::models::{
    appointment::{Appointment, AppointmentDetails},
    availability::{AvailabilityConfig, WeeklySchedule},
    patient::Patient,
};
use eyre::Report;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailability {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub provider_id: Uuid,
    pub slot_duration_minutes: i32,
    pub weekly_schedule: Json<WeeklySchedule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbAvailability> for AvailabilityConfig {
    fn from(row: DbAvailability) -> Self {
        Self {
            id: row.id,
            workspace_id: row.workspace_id,
            provider_id: row.provider_id,
            slot_duration_minutes: row.slot_duration_minutes,
            weekly_schedule: row.weekly_schedule.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Self {
            id: row.id,
            workspace_id: row.workspace_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub patient_id: Uuid,
    pub date_time_start: NaiveDateTime,
    pub date_time_end: NaiveDateTime,
    pub duration_minutes: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = Report;

    fn try_from(row: DbAppointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            workspace_id: row.workspace_id,
            patient_id: row.patient_id,
            date_time_start: row.date_time_start,
            date_time_end: row.date_time_end,
            duration_minutes: row.duration_minutes,
            status: row.status.parse()?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// An appointment row joined with its patient's contact columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointmentWithPatient {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub appointment: DbAppointment,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub patient_created_at: DateTime<Utc>,
}

impl TryFrom<DbAppointmentWithPatient> for AppointmentDetails {
    type Error = Report;

    fn try_from(row: DbAppointmentWithPatient) -> Result<Self, Self::Error> {
        let patient = Patient {
            id: row.appointment.patient_id,
            workspace_id: row.appointment.workspace_id,
            name: row.patient_name,
            email: row.patient_email,
            phone: row.patient_phone,
            created_at: row.patient_created_at,
        };

        Ok(Self {
            appointment: row.appointment.try_into()?,
            patient,
        })
    }
}
