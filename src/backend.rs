use crate::error::BookingError;
use crate::types::{Booking, NewBooking};
use chrono::NaiveDate;

/// Persistent booking store. `create_booking` must reject a second booking
/// for the same yacht, date and slot atomically.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    fn bookings_on(&self, yacht_id: i32, date: NaiveDate) -> Result<Vec<Booking>, BookingError>;
    fn bookings(&self) -> Result<Vec<Booking>, BookingError>;
    fn create_booking(&self, booking: NewBooking) -> Result<Booking, BookingError>;
}
