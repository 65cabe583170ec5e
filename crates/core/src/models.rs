pub mod appointment;
pub mod availability;
pub mod patient;
pub mod time_slot;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use self::{
    availability::AvailabilitySummary,
    time_slot::{SlotAvailability, TimeWindow},
};

/// Result of a public slot query for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySlotsResponse {
    pub availability: AvailabilitySummary,
    pub booked_windows: Vec<TimeWindow>,
    pub slots: Vec<SlotAvailability>,
}

/// The tenant-scoped identity of an authenticated provider, as established
/// by the upstream session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSession {
    pub workspace_id: Uuid,
    pub provider_id: Uuid,
}
