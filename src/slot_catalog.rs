use chrono::{Duration, NaiveTime};
use serde::Serialize;

use crate::types::TimeSlot;

/// (slot, label, start hour, end hour) in club-local time.
const SLOT_TABLE: [(TimeSlot, &str, i64, i64); 4] = [
    (TimeSlot::Morning, "Morning (9:00 AM - 1:00 PM)", 9, 13),
    (TimeSlot::Afternoon, "Afternoon (1:00 PM - 5:00 PM)", 13, 17),
    (TimeSlot::Evening, "Evening (5:00 PM - 9:00 PM)", 17, 21),
    (TimeSlot::Night, "Night (9:00 PM - 1:00 AM)", 21, 1),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDefinition {
    pub id: TimeSlot,
    pub label: &'static str,
    pub start_clock: NaiveTime,
    pub end_clock: NaiveTime,
}

impl SlotDefinition {
    /// True when the slot ends on the day after it starts.
    pub fn spans_midnight(&self) -> bool {
        self.end_clock <= self.start_clock
    }
}

fn clock(hour: i64) -> NaiveTime {
    NaiveTime::default() + Duration::hours(hour)
}

/// The canonical slots in display order.
pub fn slots() -> Vec<SlotDefinition> {
    TimeSlot::ALL.into_iter().map(definition).collect()
}

pub fn definition(slot: TimeSlot) -> SlotDefinition {
    // SLOT_TABLE follows the declaration order of TimeSlot
    let (id, label, start, end) = SLOT_TABLE[slot as usize];
    SlotDefinition {
        id,
        label,
        start_clock: clock(start),
        end_clock: clock(end),
    }
}
