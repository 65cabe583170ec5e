//! # Booking Service
//!
//! Orchestrates the public slot query, the reservation flow and the
//! provider-side operations on top of a [`BookingRepository`].
//!
//! ## Reservation
//!
//! 1. Load the availability config.
//! 2. Regenerate the day's slots and require the requested start to be one of them.
//! 3. Read the currently booked windows for that day.
//! 4. Reject with a conflict if the slot is taken.
//! 5. Resolve the patient by `(workspace, email)` and insert the appointment,
//!    both inside the repository's atomic check-and-insert. A lost race is a
//!    conflict and leaves no patient or appointment behind.
//!
//! Steps 3 and 4 give a fast failure without writing anything; step 5 is the
//! one that actually guarantees a single pending appointment per window.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        ProviderSession, QuerySlotsResponse,
        appointment::{Appointment, AppointmentDetails, AppointmentStatus, CreateBookingRequest, NewAppointment},
        availability::{AvailabilityConfig, AvailabilityRequest},
        patient::PatientIdentity,
        time_slot::TimeWindow,
    },
    repository::BookingRepository,
    slots::{generate_slots, mark_availability},
};

#[derive(Clone)]
pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    /// Slots for `date` annotated with availability, plus the booked windows
    /// they were checked against.
    pub async fn query_slots(&self, availability_id: Uuid, date: NaiveDate) -> BookingResult<QuerySlotsResponse> {
        let config = self.load_availability(availability_id).await?;
        let booked_windows = self
            .repo
            .list_booked_windows(config.workspace_id, TimeWindow::whole_day(date)?)
            .await?;

        let slots = mark_availability(&generate_slots(&config, date)?, &booked_windows);
        debug!(
            "Slot query: availability={}, date={}, slots={}, booked={}",
            availability_id,
            date,
            slots.len(),
            booked_windows.len()
        );

        Ok(QuerySlotsResponse {
            availability: (&config).into(),
            booked_windows,
            slots,
        })
    }

    /// Books the slot starting at `request.start` for the given patient.
    pub async fn reserve(&self, request: CreateBookingRequest) -> BookingResult<Appointment> {
        let identity = PatientIdentity::new(&request.name, &request.email, &request.phone);
        identity.validate()?;

        let config = self.load_availability(request.availability_id).await?;
        let date = request.start.date();

        let slot = generate_slots(&config, date)?
            .into_iter()
            .find(|slot| slot.start == request.start)
            .ok_or_else(|| {
                BookingError::Validation(format!(
                    "start: {} is not a bookable slot for this availability",
                    request.start
                ))
            })?;

        if let Some(end) = request.end {
            if end != slot.end {
                debug!("Ignoring client-supplied end {} in favour of {}", end, slot.end);
            }
        }

        let booked = self
            .repo
            .list_booked_windows(config.workspace_id, TimeWindow::whole_day(date)?)
            .await?;
        if booked.iter().any(|window| window.overlaps(&slot)) {
            return Err(already_booked(&slot));
        }

        let new_appointment = NewAppointment {
            workspace_id: config.workspace_id,
            patient: identity.normalized(),
            window: slot,
            duration_minutes: config.slot_duration_minutes,
            notes: request.notes.filter(|notes| !notes.trim().is_empty()),
        };

        match self.repo.insert_appointment_if_free(new_appointment).await? {
            Some(appointment) => {
                info!(
                    "Appointment {} booked: workspace={}, patient={}, start={}",
                    appointment.id, appointment.workspace_id, appointment.patient_id, appointment.date_time_start
                );
                Ok(appointment)
            }
            None => {
                warn!("Lost reservation race for {} in workspace {}", slot.start, config.workspace_id);
                Err(already_booked(&slot))
            }
        }
    }

    pub async fn provider_availability(&self, session: ProviderSession) -> BookingResult<AvailabilityConfig> {
        self.repo
            .get_provider_availability(session.workspace_id, session.provider_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("No availability configured for this provider".to_string()))
    }

    /// First-time setup of the provider's weekly availability.
    pub async fn create_availability(
        &self,
        session: ProviderSession,
        request: AvailabilityRequest,
    ) -> BookingResult<AvailabilityConfig> {
        request.validate()?;

        let config = self
            .repo
            .insert_availability(
                session.workspace_id,
                session.provider_id,
                request.slot_duration_minutes,
                &request.weekly_schedule,
            )
            .await?
            .ok_or_else(|| {
                BookingError::Conflict("Availability is already configured for this provider".to_string())
            })?;

        info!("Availability {} created for provider {}", config.id, session.provider_id);
        Ok(config)
    }

    /// Replaces the provider's duration and whole weekly schedule at once.
    pub async fn replace_availability(
        &self,
        session: ProviderSession,
        request: AvailabilityRequest,
    ) -> BookingResult<AvailabilityConfig> {
        request.validate()?;

        let config = self
            .repo
            .replace_availability(
                session.workspace_id,
                session.provider_id,
                request.slot_duration_minutes,
                &request.weekly_schedule,
            )
            .await?
            .ok_or_else(|| BookingError::NotFound("No availability configured for this provider".to_string()))?;

        info!("Availability {} replaced for provider {}", config.id, session.provider_id);
        Ok(config)
    }

    pub async fn list_appointments(
        &self,
        session: ProviderSession,
        status: AppointmentStatus,
    ) -> BookingResult<Vec<AppointmentDetails>> {
        Ok(self.repo.list_appointments(session.workspace_id, status).await?)
    }

    pub async fn get_appointment(&self, session: ProviderSession, id: Uuid) -> BookingResult<AppointmentDetails> {
        self.repo
            .get_appointment(session.workspace_id, id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    /// Moves a pending appointment to `done` or `cancelled`.
    pub async fn update_status(
        &self,
        session: ProviderSession,
        id: Uuid,
        next: AppointmentStatus,
    ) -> BookingResult<Appointment> {
        let current = self.get_appointment(session, id).await?.appointment.status;
        let next = current.transition_to(next)?;

        let updated = self
            .repo
            .update_appointment_status(session.workspace_id, id, current, next)
            .await?
            .ok_or_else(|| {
                BookingError::Conflict(format!("Appointment {} was modified concurrently", id))
            })?;

        info!("Appointment {} moved from {} to {}", id, current, next);
        Ok(updated)
    }

    async fn load_availability(&self, id: Uuid) -> BookingResult<AvailabilityConfig> {
        self.repo
            .get_availability(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Availability with ID {} not found", id)))
    }
}

fn already_booked(slot: &TimeWindow) -> BookingError {
    BookingError::Conflict(format!(
        "The slot at {} is already booked, please pick another time",
        slot.start
    ))
}
