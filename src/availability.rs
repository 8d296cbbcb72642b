use chrono::NaiveDate;
use tracing::error;

use crate::{
    backend::BookingBackend,
    error::BookingError,
    types::{AvailabilityResult, SlotAvailability},
};

/// Reports which of the yacht's slots are free on `date`.
pub fn check_availability<B: BookingBackend>(
    backend: &B,
    yacht_id: i32,
    date: NaiveDate,
) -> Result<AvailabilityResult, BookingError> {
    if yacht_id < 1 {
        return Err(BookingError::Validation(format!(
            "yachtId must be positive, got {yacht_id}"
        )));
    }

    let bookings = backend.bookings_on(yacht_id, date).map_err(|err| {
        error!(%err, yacht_id, %date, "Failed to fetch bookings for availability check");
        err
    })?;

    let mut availability = AvailabilityResult::all_available();
    for booking in bookings {
        availability
            .0
            .insert(booking.slot, SlotAvailability::booked_by(booking.renter_name));
    }
    Ok(availability)
}
