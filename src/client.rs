use chrono::NaiveDate;
use reqwest::StatusCode;
use tracing::warn;

use crate::{
    booking_times,
    error::BookingError,
    http::{AvailabilityRequest, AvailabilityResponse, CreateBookingRequest},
    types::{AvailabilityResult, Booking},
};

/// Thin client for the booking endpoints, used by member-facing frontends.
#[derive(Debug, Clone)]
pub struct BookingApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl BookingApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Never fails: when availability can't be determined every slot is
    /// reported as taken.
    pub async fn check_all_availability(&self, yacht_id: i32, date: NaiveDate) -> AvailabilityResult {
        match self.try_check_all_availability(yacht_id, date).await {
            Ok(availability) => availability,
            Err(err) => {
                warn!(%err, yacht_id, %date, "Availability unknown, treating all slots as booked");
                AvailabilityResult::fail_closed()
            }
        }
    }

    async fn try_check_all_availability(
        &self,
        yacht_id: i32,
        date: NaiveDate,
    ) -> Result<AvailabilityResult, BookingError> {
        let response = self
            .http
            .post(format!("{}/bookings/check-all-availability", self.base_url))
            .json(&AvailabilityRequest { yacht_id, date })
            .send()
            .await?
            .error_for_status()?;
        let body: AvailabilityResponse = response.json().await?;
        Ok(body.availability)
    }

    pub async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, BookingError> {
        let response = self
            .http
            .post(format!("{}/bookings", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Booking>().await?);
        }

        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::CONFLICT => {
                match booking_times::slot_for_window(request.start_time, request.end_time) {
                    Some((date, slot)) => BookingError::Conflict {
                        yacht_id: request.yacht_id,
                        date,
                        slot,
                    },
                    None => BookingError::Validation(message),
                }
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => BookingError::Validation(message),
            StatusCode::SERVICE_UNAVAILABLE => BookingError::Storage(message),
            _ => BookingError::Network(format!("Unexpected status {status}: {message}")),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        backend::BookingBackend,
        http::create_app,
        payment::MockPaymentClient,
        testutils::{new_booking, MockBookingBackend, TestConfiguration},
        types::TimeSlot,
    };
    use chrono::{Duration, Local};
    use std::sync::{atomic::Ordering, Arc};

    async fn spawn_app(mock_backend: MockBookingBackend) -> String {
        let app = create_app(
            mock_backend,
            Arc::new(MockPaymentClient::new()),
            TestConfiguration,
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{address}")
    }

    fn request_for(date: NaiveDate, slot: TimeSlot) -> CreateBookingRequest {
        let window = booking_times::resolve(date, slot).unwrap();
        CreateBookingRequest {
            yacht_id: 7,
            start_time: window.start,
            end_time: window.end,
            guest_count: 2,
            renter_id: 11,
            renter_name: "Stefan".into(),
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn test_check_all_availability() {
        let mock_backend = MockBookingBackend::new();
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        mock_backend
            .0
            .store
            .create_booking(new_booking(7, date, TimeSlot::Evening, "Peter"))
            .unwrap();
        let client = BookingApiClient::new(spawn_app(mock_backend).await);

        let availability = client.check_all_availability(7, date).await;
        assert!(availability.is_available(TimeSlot::Morning));
        assert!(availability.is_available(TimeSlot::Afternoon));
        assert!(!availability.is_available(TimeSlot::Evening));
        assert!(availability.is_available(TimeSlot::Night));
    }

    #[tokio::test]
    async fn test_fail_closed_on_server_error() {
        let mock_backend = MockBookingBackend::new();
        mock_backend.0.success.store(false, Ordering::SeqCst);
        let client = BookingApiClient::new(spawn_app(mock_backend.clone()).await);

        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let availability = client.check_all_availability(7, date).await;
        assert_eq!(availability, AvailabilityResult::fail_closed());
        assert_eq!(mock_backend.0.calls_to_bookings_on.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fail_closed_when_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        let client = BookingApiClient::new(format!("http://{address}"));

        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let availability = client.check_all_availability(7, date).await;
        for slot in TimeSlot::ALL {
            assert!(!availability.is_available(slot));
        }
    }

    #[tokio::test]
    async fn test_create_booking_errors() {
        let client = BookingApiClient::new(spawn_app(MockBookingBackend::new()).await);
        let date = Local::now().date_naive() + Duration::days(10);

        let booking = client
            .create_booking(&request_for(date, TimeSlot::Night))
            .await
            .unwrap();
        assert_eq!(booking.slot, TimeSlot::Night);

        let err = client
            .create_booking(&request_for(date, TimeSlot::Night))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BookingError::Conflict {
                yacht_id: 7,
                date,
                slot: TimeSlot::Night
            }
        );

        let mut invalid = request_for(date, TimeSlot::Morning);
        invalid.guest_count = 0;
        let err = client.create_booking(&invalid).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }
}
