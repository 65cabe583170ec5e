//! # Slot Generation
//!
//! Turns a weekly availability config into concrete slots for one calendar
//! date, then annotates those slots against the windows already booked.
//!
//! Both functions are pure: the same inputs always give the same output, and
//! neither touches storage.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::errors::{BookingError, BookingResult};
use crate::models::{
    availability::AvailabilityConfig,
    time_slot::{SlotAvailability, TimeWindow},
};

/// Produces the ordered slots a provider offers on `date`.
///
/// Slots start at the day's `startTime` and step by the configured duration.
/// A trailing interval shorter than the duration is dropped, so no slot ever
/// ends after `endTime`. Disabled days, inverted hours and non-positive
/// durations produce no slots.
///
/// Fails only when a slot would end past the last representable date.
///
/// # Example
///
/// ```
/// # use chrono::{NaiveDate, NaiveTime, Utc};
/// # use uuid::Uuid;
/// # use clinicslot_core::models::availability::{AvailabilityConfig, DaySchedule, WeeklySchedule};
/// # use clinicslot_core::slots::generate_slots;
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
/// let config = AvailabilityConfig {
///     id: Uuid::new_v4(),
///     workspace_id: Uuid::new_v4(),
///     provider_id: Uuid::new_v4(),
///     slot_duration_minutes: 20,
///     weekly_schedule: WeeklySchedule::uniform(DaySchedule::hours(nine, ten)),
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
/// let slots = generate_slots(&config, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()).unwrap();
/// assert_eq!(slots.len(), 3);
/// ```
pub fn generate_slots(config: &AvailabilityConfig, date: NaiveDate) -> BookingResult<Vec<TimeWindow>> {
    let step = i64::from(config.slot_duration_minutes);
    if step <= 0 {
        return Ok(Vec::new());
    }

    let day = config.weekly_schedule.day(date.weekday());
    let Some((open, close)) = day.window_minutes() else {
        return Ok(Vec::new());
    };

    let midnight = date.and_time(NaiveTime::MIN);
    let (open, close) = (i64::from(open), i64::from(close));

    let mut slots = Vec::with_capacity(((close - open) / step) as usize);
    let mut offset = open;
    while offset + step <= close {
        let start = midnight
            .checked_add_signed(Duration::minutes(offset))
            .ok_or_else(|| BookingError::Validation("date out of range".to_string()))?;
        slots.push(TimeWindow::starting_at(start, step)?);
        offset += step;
    }

    Ok(slots)
}

/// Marks each slot unavailable when it overlaps any booked window.
///
/// Overlap is half-open: a slot ending exactly when a booking starts stays
/// available.
pub fn mark_availability(slots: &[TimeWindow], booked_windows: &[TimeWindow]) -> Vec<SlotAvailability> {
    slots
        .iter()
        .map(|slot| SlotAvailability {
            time: slot.start.format("%H:%M").to_string(),
            start: slot.start,
            end: slot.end,
            available: !booked_windows.iter().any(|booked| booked.overlaps(slot)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::availability::{DaySchedule, WeeklySchedule};
    use chrono::{NaiveDateTime, Utc, Weekday};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_time(hm(h, m))
    }

    fn config(duration: i32, schedule: WeeklySchedule) -> AvailabilityConfig {
        AvailabilityConfig {
            id: Uuid::new_v4(),
            workspace_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            slot_duration_minutes: duration,
            weekly_schedule: schedule,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // 2025-03-03 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    #[test]
    fn uses_the_schedule_of_the_dates_weekday() {
        let schedule = WeeklySchedule::uniform(DaySchedule::closed())
            .with_day(Weekday::Tue, DaySchedule::hours(hm(8, 0), hm(9, 0)));
        let cfg = config(30, schedule);

        assert!(generate_slots(&cfg, monday()).unwrap().is_empty());

        let tuesday = monday().succ_opt().unwrap();
        let slots = generate_slots(&cfg, tuesday).unwrap();
        assert_eq!(
            slots,
            vec![
                TimeWindow::new(at(tuesday, 8, 0), at(tuesday, 8, 30)),
                TimeWindow::new(at(tuesday, 8, 30), at(tuesday, 9, 0)),
            ]
        );
    }

    #[test]
    fn all_day_covers_midnight_to_midnight() {
        let cfg = config(60, WeeklySchedule::uniform(DaySchedule::all_day()));
        let slots = generate_slots(&cfg, monday()).unwrap();

        assert_eq!(slots.len(), 24);
        assert_eq!(slots[0].start, at(monday(), 0, 0));
        assert_eq!(slots[23].end, monday().succ_opt().unwrap().and_time(NaiveTime::MIN));
    }

    #[test]
    fn last_representable_day() {
        let morning = config(30, WeeklySchedule::uniform(DaySchedule::hours(hm(9, 0), hm(10, 0))));
        assert_eq!(generate_slots(&morning, NaiveDate::MAX).unwrap().len(), 2);

        // The final all-day slot would end on a date chrono cannot represent.
        let all_day = config(60, WeeklySchedule::uniform(DaySchedule::all_day()));
        assert!(matches!(
            generate_slots(&all_day, NaiveDate::MAX),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn disabled_beats_all_day() {
        let mut day = DaySchedule::all_day();
        day.disabled = true;
        let cfg = config(30, WeeklySchedule::uniform(day));

        assert!(generate_slots(&cfg, monday()).unwrap().is_empty());
    }

    #[test]
    fn inverted_hours_and_bad_durations_yield_nothing() {
        let inverted = config(30, WeeklySchedule::uniform(DaySchedule::hours(hm(17, 0), hm(9, 0))));
        assert!(generate_slots(&inverted, monday()).unwrap().is_empty());

        let open = WeeklySchedule::uniform(DaySchedule::hours(hm(9, 0), hm(17, 0)));
        assert!(generate_slots(&config(0, open), monday()).unwrap().is_empty());
        assert!(generate_slots(&config(-15, open), monday()).unwrap().is_empty());
    }

    #[test]
    fn duration_longer_than_window_yields_nothing() {
        let cfg = config(90, WeeklySchedule::uniform(DaySchedule::hours(hm(9, 0), hm(10, 0))));
        assert!(generate_slots(&cfg, monday()).unwrap().is_empty());
    }

    #[test]
    fn touching_booking_leaves_neighbours_available() {
        let date = monday();
        let slots = vec![
            TimeWindow::new(at(date, 9, 0), at(date, 9, 30)),
            TimeWindow::new(at(date, 9, 30), at(date, 10, 0)),
            TimeWindow::new(at(date, 10, 0), at(date, 10, 30)),
        ];
        let booked = vec![TimeWindow::new(at(date, 9, 30), at(date, 10, 0))];

        let marked = mark_availability(&slots, &booked);
        let flags: Vec<bool> = marked.iter().map(|s| s.available).collect();
        assert_eq!(flags, vec![true, false, true]);
        assert_eq!(marked[1].time, "09:30");
    }

    #[test]
    fn partial_overlap_blocks_every_touched_slot() {
        let date = monday();
        let slots = vec![
            TimeWindow::new(at(date, 9, 0), at(date, 9, 30)),
            TimeWindow::new(at(date, 9, 30), at(date, 10, 0)),
            TimeWindow::new(at(date, 10, 0), at(date, 10, 30)),
        ];
        // A 45-minute booking left over from an older, longer slot duration.
        let booked = vec![TimeWindow::new(at(date, 9, 15), at(date, 10, 0))];

        let flags: Vec<bool> = mark_availability(&slots, &booked)
            .iter()
            .map(|s| s.available)
            .collect();
        assert_eq!(flags, vec![false, false, true]);
    }
}
