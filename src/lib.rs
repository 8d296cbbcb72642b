use std::sync::Arc;

use crate::{backend::BookingBackend, configuration::Configuration, payment::PaymentClient};

pub mod availability;
pub mod backend;
pub mod booking_times;
pub mod client;
pub mod configuration;
pub mod configuration_handler;
pub mod database_interface;
pub mod error;
pub mod http;
pub mod local_bookings;
pub mod payment;
mod schema;
pub mod slot_catalog;
#[cfg(test)]
mod testutils;
pub mod types;

#[derive(Clone)]
pub struct AppState<B: BookingBackend, C: Configuration> {
    pub booking_backend: B,
    pub payment_client: Arc<dyn PaymentClient>,
    pub configuration: C,
}
