use crate::schema::bookings::{self, dsl};
use crate::types::{Booking, NewBooking};
use crate::{backend::BookingBackend, booking_times, error::BookingError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{
    Connection, ConnectionError, ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable,
    RunQueryDsl, Selectable, SelectableHelper,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Insertable)]
#[diesel(table_name = bookings)]
struct NewBookingRow {
    yacht_id: i32,
    booking_date: NaiveDate,
    slot: String,
    renter_id: i32,
    renter_name: String,
    guest_count: i32,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    special_requests: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct BookingRow {
    id: Uuid,
    yacht_id: i32,
    booking_date: NaiveDate,
    slot: String,
    renter_id: i32,
    renter_name: String,
    guest_count: i32,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    special_requests: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = BookingError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            yacht_id: row.yacht_id,
            date: row.booking_date,
            slot: row.slot.parse()?,
            renter_id: row.renter_id,
            renter_name: row.renter_name,
            guest_count: row.guest_count,
            start_time: row.start_time,
            end_time: row.end_time,
            special_requests: row.special_requests,
            created_at: row.created_at,
        })
    }
}

fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, BookingError> {
    rows.into_iter().map(Booking::try_from).collect()
}

fn storage_error(err: DieselError, context: &str) -> BookingError {
    error!(%err, "{context}");
    BookingError::Storage(format!("{context}: {err}"))
}

#[derive(Clone)]
pub struct DatabaseInterface {
    connection: Arc<Mutex<PgConnection>>,
}

impl DatabaseInterface {
    pub fn new(database_url: &str) -> Result<Self, ConnectionError> {
        let connection = Self::establish_connection(database_url)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
        PgConnection::establish(database_url)
    }

    fn connection(&self) -> Result<MutexGuard<'_, PgConnection>, BookingError> {
        self.connection
            .lock()
            .map_err(|_| BookingError::Storage("Database connection lock poisoned".into()))
    }

    #[cfg(test)]
    fn remove_all_bookings(&self) -> Result<(), BookingError> {
        let mut connection = self.connection()?;
        diesel::delete(bookings::table)
            .execute(&mut *connection)
            .map_err(|err| storage_error(err, "Failed to clear bookings"))?;
        Ok(())
    }
}

impl BookingBackend for DatabaseInterface {
    fn bookings_on(&self, yacht_id: i32, date: NaiveDate) -> Result<Vec<Booking>, BookingError> {
        let mut connection = self.connection()?;
        let rows = dsl::bookings
            .filter(dsl::yacht_id.eq(yacht_id))
            .filter(dsl::booking_date.eq(date))
            .order(dsl::start_time.asc())
            .select(BookingRow::as_select())
            .load(&mut *connection)
            .map_err(|err| storage_error(err, "Failed to read bookings from database"))?;
        into_bookings(rows)
    }

    fn bookings(&self) -> Result<Vec<Booking>, BookingError> {
        let mut connection = self.connection()?;
        let rows = dsl::bookings
            .order((dsl::start_time.asc(), dsl::yacht_id.asc()))
            .select(BookingRow::as_select())
            .load(&mut *connection)
            .map_err(|err| storage_error(err, "Failed to read bookings from database"))?;
        into_bookings(rows)
    }

    fn create_booking(&self, booking: NewBooking) -> Result<Booking, BookingError> {
        let window = booking_times::resolve(booking.date, booking.slot)?;
        let row = NewBookingRow {
            yacht_id: booking.yacht_id,
            booking_date: booking.date,
            slot: booking.slot.to_string(),
            renter_id: booking.renter_id,
            renter_name: booking.renter_name,
            guest_count: booking.guest_count,
            start_time: window.start,
            end_time: window.end,
            special_requests: booking.special_requests,
        };

        let mut connection = self.connection()?;
        // The unique (yacht_id, booking_date, slot) constraint decides races
        let result = diesel::insert_into(bookings::table)
            .values(&row)
            .returning(BookingRow::as_returning())
            .get_result(&mut *connection);

        match result {
            Ok(created) => {
                let created = Booking::try_from(created)?;
                info!(id = %created.id, yacht_id = created.yacht_id, date = %created.date, slot = %created.slot, "Booking created");
                Ok(created)
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                let err = BookingError::Conflict {
                    yacht_id: booking.yacht_id,
                    date: booking.date,
                    slot: booking.slot,
                };
                warn!(%err, "Rejected double booking");
                Err(err)
            }
            Err(err) => Err(storage_error(err, "Booking can't be created")),
        }
    }
}
