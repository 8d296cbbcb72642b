use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::NaiveDate;

use crate::{
    backend::BookingBackend,
    configuration::Configuration,
    error::BookingError,
    local_bookings::LocalBookings,
    types::{Booking, NewBooking, TimeSlot},
};

pub const ADMIN_PASSWORD: &str = "123";

pub fn new_booking(yacht_id: i32, date: NaiveDate, slot: TimeSlot, renter_name: &str) -> NewBooking {
    NewBooking {
        yacht_id,
        date,
        slot,
        renter_id: 1,
        renter_name: renter_name.into(),
        guest_count: 4,
        special_requests: None,
    }
}

#[derive(Clone)]
pub struct TestConfiguration;

impl Configuration for TestConfiguration {
    fn admin_password(&self) -> String {
        ADMIN_PASSWORD.into()
    }

    fn port(&self) -> String {
        "0".into()
    }

    fn database_url(&self) -> Option<String> {
        None
    }

    fn stripe_secret_key(&self) -> String {
        "sk_test_123".into()
    }

    fn stripe_api_base(&self) -> String {
        "http://127.0.0.1:9".into()
    }

    fn currency(&self) -> String {
        "usd".into()
    }
}

/// Counts calls and delegates to an in-memory store while `success` is set.
pub struct MockBookingBackendInner {
    pub success: AtomicBool,
    pub calls_to_bookings_on: AtomicU64,
    pub calls_to_bookings: AtomicU64,
    pub calls_to_create_booking: AtomicU64,
    pub last_created: Mutex<Option<NewBooking>>,
    pub store: LocalBookings,
}

#[derive(Clone)]
pub struct MockBookingBackend(pub Arc<MockBookingBackendInner>);

impl MockBookingBackendInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_bookings_on: AtomicU64::default(),
            calls_to_bookings: AtomicU64::default(),
            calls_to_create_booking: AtomicU64::default(),
            last_created: Mutex::default(),
            store: LocalBookings::default(),
        }
    }
}

impl MockBookingBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBookingBackendInner::new()))
    }

    fn result(&self) -> Result<(), BookingError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(BookingError::Storage("Supposed to fail".into())),
        }
    }
}

impl BookingBackend for MockBookingBackend {
    fn bookings_on(&self, yacht_id: i32, date: NaiveDate) -> Result<Vec<Booking>, BookingError> {
        self.0.calls_to_bookings_on.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0.store.bookings_on(yacht_id, date)
    }

    fn bookings(&self) -> Result<Vec<Booking>, BookingError> {
        self.0.calls_to_bookings.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0.store.bookings()
    }

    fn create_booking(&self, booking: NewBooking) -> Result<Booking, BookingError> {
        self.0.calls_to_create_booking.fetch_add(1, Ordering::SeqCst);
        *self.0.last_created.lock().unwrap() = Some(booking.clone());
        self.result()?;
        self.0.store.create_booking(booking)
    }
}
