//! In-memory [`BookingRepository`] for deterministic tests.
//!
//! Everything lives behind a single async mutex, so each trait call, and in
//! particular the check, patient resolution and insert of
//! `insert_appointment_if_free`, is atomic with respect to every other call.

use async_trait::async_trait;
use chrono::Utc;
use clinicslot_core::{
    models::{
        appointment::{Appointment, AppointmentDetails, AppointmentStatus, NewAppointment},
        availability::{AvailabilityConfig, WeeklySchedule},
        patient::{Patient, PatientIdentity},
        time_slot::TimeWindow,
    },
    repository::BookingRepository,
};
use eyre::{Result, eyre};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    availability: Vec<AvailabilityConfig>,
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
}

impl MemoryState {
    fn find_or_create_patient(&mut self, workspace_id: Uuid, identity: &PatientIdentity) -> Patient {
        if let Some(existing) = self
            .patients
            .iter()
            .find(|p| p.workspace_id == workspace_id && p.email.eq_ignore_ascii_case(&identity.email))
        {
            return existing.clone();
        }

        let patient = Patient {
            id: Uuid::new_v4(),
            workspace_id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            phone: identity.phone.clone(),
            created_at: Utc::now(),
        };
        self.patients.push(patient.clone());
        patient
    }

    fn details(&self, appointment: &Appointment) -> Result<AppointmentDetails> {
        let patient = self
            .patients
            .iter()
            .find(|p| p.id == appointment.patient_id)
            .ok_or_else(|| eyre!("patient {} missing for appointment {}", appointment.patient_id, appointment.id))?;

        Ok(AppointmentDetails {
            appointment: appointment.clone(),
            patient: patient.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an appointment as-is, bypassing the overlap check.
    pub async fn seed_appointment(&self, appointment: Appointment) {
        self.state.lock().await.appointments.push(appointment);
    }

    pub async fn seed_patient(&self, patient: Patient) {
        self.state.lock().await.patients.push(patient);
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.state.lock().await.appointments.clone()
    }

    pub async fn patients(&self) -> Vec<Patient> {
        self.state.lock().await.patients.clone()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn get_availability(&self, id: Uuid) -> Result<Option<AvailabilityConfig>> {
        let state = self.state.lock().await;
        Ok(state.availability.iter().find(|c| c.id == id).cloned())
    }

    async fn get_provider_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<AvailabilityConfig>> {
        let state = self.state.lock().await;
        Ok(state
            .availability
            .iter()
            .find(|c| c.workspace_id == workspace_id && c.provider_id == provider_id)
            .cloned())
    }

    async fn insert_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
        slot_duration_minutes: i32,
        weekly_schedule: &WeeklySchedule,
    ) -> Result<Option<AvailabilityConfig>> {
        let mut state = self.state.lock().await;
        if state
            .availability
            .iter()
            .any(|c| c.workspace_id == workspace_id && c.provider_id == provider_id)
        {
            return Ok(None);
        }

        let now = Utc::now();
        let config = AvailabilityConfig {
            id: Uuid::new_v4(),
            workspace_id,
            provider_id,
            slot_duration_minutes,
            weekly_schedule: *weekly_schedule,
            created_at: now,
            updated_at: now,
        };
        state.availability.push(config.clone());
        Ok(Some(config))
    }

    async fn replace_availability(
        &self,
        workspace_id: Uuid,
        provider_id: Uuid,
        slot_duration_minutes: i32,
        weekly_schedule: &WeeklySchedule,
    ) -> Result<Option<AvailabilityConfig>> {
        let mut state = self.state.lock().await;
        let Some(config) = state
            .availability
            .iter_mut()
            .find(|c| c.workspace_id == workspace_id && c.provider_id == provider_id)
        else {
            return Ok(None);
        };

        config.slot_duration_minutes = slot_duration_minutes;
        config.weekly_schedule = *weekly_schedule;
        config.updated_at = Utc::now();
        Ok(Some(config.clone()))
    }

    async fn list_booked_windows(&self, workspace_id: Uuid, range: TimeWindow) -> Result<Vec<TimeWindow>> {
        let state = self.state.lock().await;
        let mut windows: Vec<TimeWindow> = state
            .appointments
            .iter()
            .filter(|a| a.workspace_id == workspace_id && a.status.blocks_slot())
            .map(Appointment::window)
            .filter(|w| w.overlaps(&range))
            .collect();
        windows.sort();
        Ok(windows)
    }

    async fn insert_appointment_if_free(&self, appointment: NewAppointment) -> Result<Option<Appointment>> {
        let mut state = self.state.lock().await;
        let taken = state.appointments.iter().any(|a| {
            a.workspace_id == appointment.workspace_id
                && a.status.blocks_slot()
                && a.window().overlaps(&appointment.window)
        });
        if taken {
            return Ok(None);
        }

        let patient = state.find_or_create_patient(appointment.workspace_id, &appointment.patient);

        let now = Utc::now();
        let created = Appointment {
            id: Uuid::new_v4(),
            workspace_id: appointment.workspace_id,
            patient_id: patient.id,
            date_time_start: appointment.window.start,
            date_time_end: appointment.window.end,
            duration_minutes: appointment.duration_minutes,
            status: AppointmentStatus::Pending,
            notes: appointment.notes,
            created_at: now,
            updated_at: now,
        };
        state.appointments.push(created.clone());
        Ok(Some(created))
    }

    async fn get_appointment(&self, workspace_id: Uuid, id: Uuid) -> Result<Option<AppointmentDetails>> {
        let state = self.state.lock().await;
        state
            .appointments
            .iter()
            .find(|a| a.id == id && a.workspace_id == workspace_id)
            .map(|a| state.details(a))
            .transpose()
    }

    async fn list_appointments(
        &self,
        workspace_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<AppointmentDetails>> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Appointment> = state
            .appointments
            .iter()
            .filter(|a| a.workspace_id == workspace_id && a.status == status)
            .collect();
        matching.sort_by_key(|a| a.date_time_start);
        matching.into_iter().map(|a| state.details(a)).collect()
    }

    async fn update_appointment_status(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let mut state = self.state.lock().await;
        let Some(appointment) = state
            .appointments
            .iter_mut()
            .find(|a| a.id == id && a.workspace_id == workspace_id && a.status == from)
        else {
            return Ok(None);
        };

        appointment.status = to;
        appointment.updated_at = Utc::now();
        Ok(Some(appointment.clone()))
    }
}
