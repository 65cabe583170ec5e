use async_trait::async_trait;
use clinicslot_core::{
    models::{
        appointment::{Appointment, AppointmentDetails, AppointmentStatus, NewAppointment},
        availability::{AvailabilityConfig, WeeklySchedule},
        time_slot::TimeWindow,
    },
    repository::BookingRepository,
};
use mockall::mock;
use uuid::Uuid;

// Mock repository for testing
mock! {
    pub BookingRepo {}

    #[async_trait]
    impl BookingRepository for BookingRepo {
        async fn get_availability(&self, id: Uuid) -> eyre::Result<Option<AvailabilityConfig>>;

        async fn get_provider_availability(
            &self,
            workspace_id: Uuid,
            provider_id: Uuid,
        ) -> eyre::Result<Option<AvailabilityConfig>>;

        async fn insert_availability(
            &self,
            workspace_id: Uuid,
            provider_id: Uuid,
            slot_duration_minutes: i32,
            weekly_schedule: &WeeklySchedule,
        ) -> eyre::Result<Option<AvailabilityConfig>>;

        async fn replace_availability(
            &self,
            workspace_id: Uuid,
            provider_id: Uuid,
            slot_duration_minutes: i32,
            weekly_schedule: &WeeklySchedule,
        ) -> eyre::Result<Option<AvailabilityConfig>>;

        async fn list_booked_windows(
            &self,
            workspace_id: Uuid,
            range: TimeWindow,
        ) -> eyre::Result<Vec<TimeWindow>>;

        async fn insert_appointment_if_free(
            &self,
            appointment: NewAppointment,
        ) -> eyre::Result<Option<Appointment>>;

        async fn get_appointment(
            &self,
            workspace_id: Uuid,
            id: Uuid,
        ) -> eyre::Result<Option<AppointmentDetails>>;

        async fn list_appointments(
            &self,
            workspace_id: Uuid,
            status: AppointmentStatus,
        ) -> eyre::Result<Vec<AppointmentDetails>>;

        async fn update_appointment_status(
            &self,
            workspace_id: Uuid,
            id: Uuid,
            from: AppointmentStatus,
            to: AppointmentStatus,
        ) -> eyre::Result<Option<Appointment>>;
    }
}
