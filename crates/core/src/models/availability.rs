use chrono::{DateTime, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

/// Minutes in a full wall-clock day; the exclusive end of an all-day window.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Wall-clock times travel as `HH:MM`. `HH:MM:SS` is accepted on input only
/// with zero seconds, since slots are laid out on whole minutes.
mod wall_clock {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let time = NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|_| D::Error::custom(format!("invalid wall-clock time '{}', expected HH:MM", raw)))?;

        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(D::Error::custom(format!(
                "invalid wall-clock time '{}', seconds must be zero",
                raw
            )));
        }
        Ok(time)
    }
}

/// Working hours for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub disabled: bool,
}

impl DaySchedule {
    pub fn hours(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start_time,
            end_time,
            all_day: false,
            disabled: false,
        }
    }

    pub fn all_day() -> Self {
        Self {
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            all_day: true,
            disabled: false,
        }
    }

    pub fn closed() -> Self {
        Self {
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            all_day: false,
            disabled: true,
        }
    }

    /// The bookable window as minute offsets from midnight, `[start, end)`.
    ///
    /// Returns `None` when the day is disabled or its hours are inverted.
    /// `disabled` wins over `all_day`.
    pub fn window_minutes(&self) -> Option<(u32, u32)> {
        if self.disabled {
            return None;
        }
        if self.all_day {
            return Some((0, MINUTES_PER_DAY));
        }

        let start = self.start_time.num_seconds_from_midnight() / 60;
        let end = self.end_time.num_seconds_from_midnight() / 60;
        (start < end).then_some((start, end))
    }
}

/// The recurring week, one named field per day.
///
/// Unknown or missing day names fail deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeklySchedule {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
}

impl WeeklySchedule {
    /// Every day of the week set to `day`.
    pub fn uniform(day: DaySchedule) -> Self {
        Self {
            monday: day,
            tuesday: day,
            wednesday: day,
            thursday: day,
            friday: day,
            saturday: day,
            sunday: day,
        }
    }

    pub fn with_day(mut self, weekday: Weekday, day: DaySchedule) -> Self {
        *self.day_mut(weekday) = day;
        self
    }

    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn day_mut(&mut self, weekday: Weekday) -> &mut DaySchedule {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(move |weekday| (weekday, self.day(weekday)))
    }
}

/// A provider's recurring weekly availability within a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityConfig {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub provider_id: Uuid,
    pub slot_duration_minutes: i32,
    pub weekly_schedule: WeeklySchedule,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The part of a config exposed to public slot queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySummary {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub provider_id: Uuid,
    pub slot_duration_minutes: i32,
    pub weekly_schedule: WeeklySchedule,
}

impl From<&AvailabilityConfig> for AvailabilitySummary {
    fn from(config: &AvailabilityConfig) -> Self {
        Self {
            id: config.id,
            workspace_id: config.workspace_id,
            provider_id: config.provider_id,
            slot_duration_minutes: config.slot_duration_minutes,
            weekly_schedule: config.weekly_schedule,
        }
    }
}

/// Body for both first-time setup and whole-config replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub slot_duration_minutes: i32,
    pub weekly_schedule: WeeklySchedule,
}

impl AvailabilityRequest {
    pub fn validate(&self) -> BookingResult<()> {
        if !(1..=MINUTES_PER_DAY as i32).contains(&self.slot_duration_minutes) {
            return Err(BookingError::Validation(format!(
                "slotDurationMinutes must be between 1 and {}, got {}",
                MINUTES_PER_DAY, self.slot_duration_minutes
            )));
        }

        for (weekday, day) in self.weekly_schedule.days() {
            if !day.disabled && !day.all_day && day.start_time >= day.end_time {
                return Err(BookingError::Validation(format!(
                    "weeklySchedule.{}: startTime must be before endTime",
                    weekday_name(weekday)
                )));
            }
        }

        Ok(())
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
