use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use uuid::Uuid;

use crate::error::BookingError;

/// One of the four fixed daily booking windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Night,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::Night => "night",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = BookingError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == id)
            .ok_or_else(|| BookingError::InvalidSlot(id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub yacht_id: i32,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub renter_id: i32,
    pub renter_name: String,
    pub guest_count: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated booking request, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub yacht_id: i32,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub renter_id: i32,
    pub renter_name: String,
    pub guest_count: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub available: bool,
    pub booked_by: Option<String>,
}

impl SlotAvailability {
    pub fn free() -> Self {
        Self {
            available: true,
            booked_by: None,
        }
    }

    pub fn booked_by(renter_name: impl Into<String>) -> Self {
        Self {
            available: false,
            booked_by: Some(renter_name.into()),
        }
    }
}

/// Per-slot availability of one yacht on one date. Always covers every slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityResult(pub BTreeMap<TimeSlot, SlotAvailability>);

impl AvailabilityResult {
    pub fn all_available() -> Self {
        Self(
            TimeSlot::ALL
                .into_iter()
                .map(|slot| (slot, SlotAvailability::free()))
                .collect(),
        )
    }

    /// Used whenever availability could not be determined.
    pub fn fail_closed() -> Self {
        Self(
            TimeSlot::ALL
                .into_iter()
                .map(|slot| {
                    (
                        slot,
                        SlotAvailability {
                            available: false,
                            booked_by: None,
                        },
                    )
                })
                .collect(),
        )
    }

    pub fn slot(&self, slot: TimeSlot) -> Option<&SlotAvailability> {
        self.0.get(&slot)
    }

    pub fn is_available(&self, slot: TimeSlot) -> bool {
        self.slot(slot).is_some_and(|status| status.available)
    }
}
