use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    patient::{Patient, PatientIdentity},
    time_slot::TimeWindow,
};
use crate::errors::{BookingError, BookingResult};

/// Appointment lifecycle.
///
/// ```text
/// pending ──► done
///    │
///    └──────► cancelled
/// ```
///
/// `done` and `cancelled` are terminal and never block new bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Done,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Done => "done",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Pending)
    }

    /// Only pending appointments occupy their window.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, AppointmentStatus::Pending)
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Pending, AppointmentStatus::Done)
                | (AppointmentStatus::Pending, AppointmentStatus::Cancelled)
        )
    }

    pub fn transition_to(self, next: AppointmentStatus) -> BookingResult<AppointmentStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BookingError::Validation(format!(
                "status cannot change from {} to {}",
                self, next
            )))
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "done" => Ok(AppointmentStatus::Done),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(BookingError::Validation(format!(
                "unknown appointment status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub patient_id: Uuid,
    pub date_time_start: NaiveDateTime,
    pub date_time_end: NaiveDateTime,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.date_time_start, self.date_time_end)
    }
}

/// A pending appointment about to be written, with the contact details of
/// the patient it belongs to. The patient is resolved in the same atomic
/// unit as the insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub workspace_id: Uuid,
    pub patient: PatientIdentity,
    pub window: TimeWindow,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

/// An appointment joined with its patient's contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient: Patient,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub availability_id: Uuid,
    pub start: NaiveDateTime,
    /// Advisory only; the end is always derived from the slot duration.
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub appointment: Appointment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}
