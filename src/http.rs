use crate::availability::check_availability;
use crate::backend::BookingBackend;
use crate::booking_times;
use crate::configuration::Configuration;
use crate::error::BookingError;
use crate::payment::{PaymentClient, PaymentIntentRequest};
use crate::slot_catalog;
use crate::types::{AvailabilityResult, Booking, NewBooking};
use crate::AppState;
use axum::body::Body;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use validator::Validate;

lazy_static! {
    static ref PAYMENT_INTENT_ID: Regex = Regex::new(r"^pi_[A-Za-z0-9_]+$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub yacht_id: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub availability: AvailabilityResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(range(min = 1))]
    pub yacht_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[validate(range(min = 1, max = 12))]
    pub guest_count: i32,
    #[validate(range(min = 1))]
    pub renter_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub renter_name: String,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

impl CreateBookingRequest {
    /// Validates the request and maps its window back to a slot.
    pub fn into_new_booking(self, now: NaiveDateTime) -> Result<NewBooking, BookingError> {
        self.validate()?;

        let (date, slot) = booking_times::slot_for_window(self.start_time, self.end_time)
            .ok_or_else(|| {
                BookingError::Validation(format!(
                    "{} - {} does not match a bookable slot",
                    self.start_time, self.end_time
                ))
            })?;
        if self.start_time < now {
            return Err(BookingError::Validation(format!(
                "The {slot} slot on {date} has already started"
            )));
        }

        Ok(NewBooking {
            yacht_id: self.yacht_id,
            date,
            slot,
            renter_id: self.renter_id,
            renter_name: self.renter_name,
            guest_count: self.guest_count,
            special_requests: self.special_requests,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentIntentRequest {
    /// Major currency units, within the provider's accepted bounds
    #[validate(range(min = 0.5, max = 999_999.99))]
    amount: f64,
    #[validate(length(min = 1, max = 500))]
    description: String,
    #[validate(length(min = 1))]
    service_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentResponse {
    payment_intent_id: String,
    client_secret: Option<String>,
    amount: i64,
    currency: String,
    status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ConfirmPaymentRequest {
    #[validate(regex(path = *PAYMENT_INTENT_ID))]
    payment_intent_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmPaymentResponse {
    payment_intent_id: String,
    status: String,
    succeeded: bool,
}

pub fn create_app<B: BookingBackend, C: Configuration>(
    booking_backend: B,
    payment_client: Arc<dyn PaymentClient>,
    configuration: C,
) -> Router {
    let state = AppState {
        booking_backend,
        payment_client,
        configuration,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/slots", get(get_slots))
        .route(
            "/bookings/check-all-availability",
            post(check_all_availability::<B, C>),
        )
        .route("/bookings", post(create_booking::<B, C>))
        .route(
            "/payments/create-payment-intent",
            post(create_payment_intent::<B, C>),
        )
        .route("/payments/confirm", post(confirm_payment::<B, C>));

    let admin = Router::new()
        .route("/admin/bookings", get(get_all_bookings::<B, C>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::<B, C>,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

async fn admin_auth<B: BookingBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let Some(auth_header) = request.headers().get("x-admin-password") else {
        return Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string()));
    };
    match auth_header.to_str() {
        Ok(password) if password == state.configuration.admin_password() => {
            Ok(next.run(request).await)
        }
        _ => {
            warn!("Rejected admin request with wrong password");
            Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
        }
    }
}

async fn get_slots() -> impl IntoResponse {
    Json(slot_catalog::slots())
}

async fn check_all_availability<B: BookingBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, BookingError> {
    let availability = check_availability(&state.booking_backend, request.yacht_id, request.date)?;
    Ok(Json(AvailabilityResponse { availability }))
}

async fn create_booking<B: BookingBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), BookingError> {
    let new_booking = request.into_new_booking(Local::now().naive_local())?;
    let booking = state.booking_backend.create_booking(new_booking)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn get_all_bookings<B: BookingBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> Result<Json<Vec<Booking>>, BookingError> {
    Ok(Json(state.booking_backend.bookings()?))
}

async fn create_payment_intent<B: BookingBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, BookingError> {
    request.validate()?;

    let intent = state
        .payment_client
        .create_intent(PaymentIntentRequest {
            amount: (request.amount * 100.0).round() as i64,
            currency: state.configuration.currency(),
            description: request.description,
            service_ids: request.service_ids,
        })
        .await?;

    Ok(Json(PaymentIntentResponse {
        payment_intent_id: intent.id,
        client_secret: intent.client_secret,
        amount: intent.amount,
        currency: intent.currency,
        status: intent.status,
    }))
}

async fn confirm_payment<B: BookingBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<ConfirmPaymentResponse>, BookingError> {
    request.validate()?;

    let intent = state
        .payment_client
        .confirm_intent(request.payment_intent_id)
        .await?;
    let succeeded = intent.succeeded();
    info!(id = %intent.id, status = %intent.status, "Payment confirmation checked");

    Ok(Json(ConfirmPaymentResponse {
        payment_intent_id: intent.id,
        status: intent.status,
        succeeded,
    }))
}
