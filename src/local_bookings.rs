use crate::{
    backend::BookingBackend,
    booking_times,
    error::BookingError,
    types::{Booking, NewBooking},
};
use chrono::{NaiveDate, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct LocalBookings {
    bookings: Arc<Mutex<HashMap<Uuid, Booking>>>,
}

impl LocalBookings {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Booking>>, BookingError> {
        self.bookings
            .lock()
            .map_err(|_| BookingError::Storage("Booking store lock poisoned".into()))
    }
}

impl BookingBackend for LocalBookings {
    fn bookings_on(&self, yacht_id: i32, date: NaiveDate) -> Result<Vec<Booking>, BookingError> {
        let mut bookings: Vec<Booking> = self
            .lock()?
            .values()
            .filter(|booking| booking.yacht_id == yacht_id && booking.date == date)
            .cloned()
            .collect();
        bookings.sort_unstable_by_key(|booking| booking.slot);
        Ok(bookings)
    }

    fn bookings(&self) -> Result<Vec<Booking>, BookingError> {
        let mut bookings: Vec<Booking> = self.lock()?.values().cloned().collect();
        bookings.sort_unstable_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then(a.yacht_id.cmp(&b.yacht_id))
        });
        Ok(bookings)
    }

    fn create_booking(&self, booking: NewBooking) -> Result<Booking, BookingError> {
        // Check and insert under one lock so concurrent requests can't both win
        let mut bookings = self.lock()?;

        let taken = bookings.values().any(|existing| {
            existing.yacht_id == booking.yacht_id
                && existing.date == booking.date
                && existing.slot == booking.slot
        });
        if taken {
            let err = BookingError::Conflict {
                yacht_id: booking.yacht_id,
                date: booking.date,
                slot: booking.slot,
            };
            warn!(%err, "Rejected double booking");
            return Err(err);
        }

        let window = booking_times::resolve(booking.date, booking.slot)?;
        let id = Uuid::new_v4();
        let created = Booking {
            id,
            yacht_id: booking.yacht_id,
            date: booking.date,
            slot: booking.slot,
            renter_id: booking.renter_id,
            renter_name: booking.renter_name,
            guest_count: booking.guest_count,
            start_time: window.start,
            end_time: window.end,
            special_requests: booking.special_requests,
            created_at: Utc::now(),
        };
        bookings.insert(id, created.clone());
        info!(%id, yacht_id = created.yacht_id, date = %created.date, slot = %created.slot, "Booking created");
        Ok(created)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutils::new_booking;
    use crate::types::TimeSlot;
    use std::thread;

    #[test]
    fn test_create_and_read_booking() {
        let local_bookings = LocalBookings::default();
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();

        let booking = local_bookings
            .create_booking(new_booking(7, date, TimeSlot::Night, "Stefan"))
            .unwrap();
        assert_eq!(booking.renter_name, "Stefan");
        assert_eq!(booking.start_time, date.and_hms_opt(21, 0, 0).unwrap());
        assert_eq!(
            booking.end_time,
            NaiveDate::from_ymd_opt(2025, 7, 5)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );

        let bookings = local_bookings.bookings_on(7, date).unwrap();
        assert_eq!(bookings, vec![booking]);
        assert!(local_bookings.bookings_on(8, date).unwrap().is_empty());
        assert!(local_bookings
            .bookings_on(7, date.succ_opt().unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_reject_double_booking() {
        let local_bookings = LocalBookings::default();
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();

        local_bookings
            .create_booking(new_booking(7, date, TimeSlot::Evening, "Stefan"))
            .unwrap();
        let err = local_bookings
            .create_booking(new_booking(7, date, TimeSlot::Evening, "Peter"))
            .unwrap_err();
        assert_eq!(
            err,
            BookingError::Conflict {
                yacht_id: 7,
                date,
                slot: TimeSlot::Evening
            }
        );

        // Other slot, other yacht and other date are independent
        local_bookings
            .create_booking(new_booking(7, date, TimeSlot::Night, "Peter"))
            .unwrap();
        local_bookings
            .create_booking(new_booking(8, date, TimeSlot::Evening, "Peter"))
            .unwrap();
        local_bookings
            .create_booking(new_booking(7, date.succ_opt().unwrap(), TimeSlot::Evening, "Peter"))
            .unwrap();
        assert_eq!(local_bookings.bookings().unwrap().len(), 4);
    }

    #[test]
    fn test_concurrent_bookings_for_same_slot() {
        let local_bookings = LocalBookings::default();
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let local_bookings = local_bookings.clone();
                thread::spawn(move || {
                    local_bookings.create_booking(new_booking(
                        7,
                        date,
                        TimeSlot::Morning,
                        &format!("Renter {i}"),
                    ))
                })
            })
            .collect();
        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        assert_eq!(local_bookings.bookings_on(7, date).unwrap().len(), 1);
    }

    #[test]
    fn test_bookings_sorted_by_start_time() {
        let local_bookings = LocalBookings::default();
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();

        local_bookings
            .create_booking(new_booking(7, date, TimeSlot::Night, "Third"))
            .unwrap();
        local_bookings
            .create_booking(new_booking(7, date, TimeSlot::Morning, "First"))
            .unwrap();
        local_bookings
            .create_booking(new_booking(7, date, TimeSlot::Afternoon, "Second"))
            .unwrap();

        let names: Vec<String> = local_bookings
            .bookings()
            .unwrap()
            .into_iter()
            .map(|booking| booking.renter_name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }
}
