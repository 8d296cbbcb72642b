use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{error::BookingError, slot_catalog, types::TimeSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Concrete start and end of `slot` on `date`. A slot that wraps midnight
/// ends on the following day, which fails on the last representable date.
pub fn resolve(date: NaiveDate, slot: TimeSlot) -> Result<BookingWindow, BookingError> {
    let definition = slot_catalog::definition(slot);
    let start = date.and_time(definition.start_clock);
    let mut end = date.and_time(definition.end_clock);
    if definition.spans_midnight() {
        end = end
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| BookingError::Validation(format!("The {slot} slot on {date} ends out of range")))?;
    }
    Ok(BookingWindow { start, end })
}

pub fn resolve_id(date: NaiveDate, slot_id: &str) -> Result<BookingWindow, BookingError> {
    let slot = slot_id.parse::<TimeSlot>()?;
    resolve(date, slot)
}

/// Finds the slot whose window on `start`'s date is exactly `[start, end]`.
pub fn slot_for_window(start: NaiveDateTime, end: NaiveDateTime) -> Option<(NaiveDate, TimeSlot)> {
    let date = start.date();
    TimeSlot::ALL
        .into_iter()
        .find(|&slot| resolve(date, slot).is_ok_and(|window| window == BookingWindow { start, end }))
        .map(|slot| (date, slot))
}
