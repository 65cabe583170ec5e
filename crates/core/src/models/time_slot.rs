use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// A half-open wall-clock interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Fails with a validation error when the end falls past the last
    /// representable date-time.
    pub fn starting_at(start: NaiveDateTime, minutes: i64) -> BookingResult<Self> {
        let end = start
            .checked_add_signed(Duration::minutes(minutes))
            .ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    /// The calendar day containing `date`, midnight to next midnight.
    pub fn whole_day(date: NaiveDate) -> BookingResult<Self> {
        let start = date.and_time(NaiveTime::MIN);
        let end = start.checked_add_signed(Duration::days(1)).ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    /// Non-empty intersection. Touching windows do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

fn out_of_range() -> BookingError {
    BookingError::Validation("date out of range".to_string())
}

/// A candidate slot annotated with whether it can still be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    /// `HH:MM` label of the slot start.
    pub time: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub available: bool,
}
