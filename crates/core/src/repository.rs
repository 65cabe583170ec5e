//! # Booking Repository
//!
//! The persistence capabilities the booking engine needs, expressed as a
//! trait so the service can run against PostgreSQL in production and an
//! in-memory store in tests.
//!
//! Every method that touches appointments or patients is scoped by
//! `workspace_id`.

use async_trait::async_trait;
use eyre::Result;
use uuid::Uuid;

use crate::models::{
    appointment::{Appointment, AppointmentDetails, AppointmentStatus, NewAppointment},
    availability::{AvailabilityConfig, WeeklySchedule},
    time_slot::TimeWindow,
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Looks up a config by its own id, regardless of workspace.
    async fn get_availability(&self, id: Uuid) -> Result<Option<AvailabilityConfig>>;

    async fn get_provider_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<AvailabilityConfig>>;

    /// Creates the provider's config. Returns `None` if one already exists.
    async fn insert_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
        slot_duration_minutes: i32,
        weekly_schedule: &WeeklySchedule,
    ) -> Result<Option<AvailabilityConfig>>;

    /// Replaces duration and schedule in one write. Returns `None` if the
    /// provider has no config yet.
    async fn replace_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
        slot_duration_minutes: i32,
        weekly_schedule: &WeeklySchedule,
    ) -> Result<Option<AvailabilityConfig>>;

    /// Windows of pending appointments that intersect `range`, ordered by start.
    async fn list_booked_windows(&self, workspace_id: Uuid, range: TimeWindow) -> Result<Vec<TimeWindow>>;

    /// Inserts a pending appointment unless its window overlaps another
    /// pending appointment in the same workspace.
    ///
    /// The overlap check, the patient find-or-create keyed by
    /// `(workspace_id, email)` and the insert are one atomic unit: existing
    /// patients are reused unchanged, and when the window is taken (including
    /// when a concurrent writer wins) `None` is returned and nothing is written.
    async fn insert_appointment_if_free(&self, appointment: NewAppointment) -> Result<Option<Appointment>>;

    async fn get_appointment(&self, workspace_id: Uuid, id: Uuid) -> Result<Option<AppointmentDetails>>;

    /// Appointments with `status`, ordered by start ascending.
    async fn list_appointments(
        &self,
        workspace_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<AppointmentDetails>>;

    /// Compare-and-set on status. Returns `None` if the appointment is
    /// missing or no longer in `from`.
    async fn update_appointment_status(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Option<Appointment>>;
}
