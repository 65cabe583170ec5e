pub mod appointment;
pub mod availability;
pub mod patient;

use async_trait::async_trait;
use clinicslot_core::{
    models::{
        appointment::{Appointment, AppointmentDetails, AppointmentStatus, NewAppointment},
        availability::{AvailabilityConfig, WeeklySchedule},
        time_slot::TimeWindow,
    },
    repository::BookingRepository,
};
use eyre::Result;
use uuid::Uuid;

use crate::DbPool;

/// [`BookingRepository`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgBookingRepository {
    pool: DbPool,
}

impl PgBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn get_availability(&self, id: Uuid) -> Result<Option<AvailabilityConfig>> {
        Ok(availability::get_availability_by_id(&self.pool, id)
            .await?
            .map(Into::into))
    }

    async fn get_provider_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<AvailabilityConfig>> {
        Ok(availability::get_availability_by_provider(&self.pool, workspace_id, provider_id)
            .await?
            .map(Into::into))
    }

    async fn insert_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
        slot_duration_minutes: i32,
        weekly_schedule: &WeeklySchedule,
    ) -> Result<Option<AvailabilityConfig>> {
        Ok(availability::insert_availability(
            &self.pool,
            workspace_id,
            provider_id,
            slot_duration_minutes,
            weekly_schedule,
        )
        .await?
        .map(Into::into))
    }

    async fn replace_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
        slot_duration_minutes: i32,
        weekly_schedule: &WeeklySchedule,
    ) -> Result<Option<AvailabilityConfig>> {
        Ok(availability::replace_availability(
            &self.pool,
            workspace_id,
            provider_id,
            slot_duration_minutes,
            weekly_schedule,
        )
        .await?
        .map(Into::into))
    }

    async fn list_booked_windows(&self, workspace_id: Uuid, range: TimeWindow) -> Result<Vec<TimeWindow>> {
        appointment::list_booked_windows(&self.pool, workspace_id, range).await
    }

    async fn insert_appointment_if_free(&self, new_appointment: NewAppointment) -> Result<Option<Appointment>> {
        appointment::insert_appointment_if_free(&self.pool, &new_appointment)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn get_appointment(&self, workspace_id: Uuid, id: Uuid) -> Result<Option<AppointmentDetails>> {
        appointment::get_appointment_with_patient(&self.pool, workspace_id, id)
            .await?
            .map(AppointmentDetails::try_from)
            .transpose()
    }

    async fn list_appointments(
        &self,
        workspace_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<AppointmentDetails>> {
        appointment::list_appointments_with_patient(&self.pool, workspace_id, status.as_str())
            .await?
            .into_iter()
            .map(AppointmentDetails::try_from)
            .collect()
    }

    async fn update_appointment_status(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        appointment::update_appointment_status(&self.pool, workspace_id, id, from.as_str(), to.as_str())
            .await?
            .map(Appointment::try_from)
            .transpose()
    }
}
