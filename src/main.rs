use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use yacht_booking::{
    configuration::Configuration, configuration_handler::ConfigurationHandler,
    database_interface::DatabaseInterface, http::create_app, local_bookings::LocalBookings,
    payment::StripePaymentClient,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("##################");
    println!("# Yacht Bookings #");
    println!("##################");

    let configuration = ConfigurationHandler::parse_arguments();
    let payment_client = Arc::new(StripePaymentClient::new(
        configuration.stripe_api_base(),
        configuration.stripe_secret_key(),
    ));

    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(?err, "Failed to bind {address}");
            std::process::exit(1);
        }
    };
    info!("Accessible at {address}");

    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseInterface::new(&database_url) {
                Ok(backend) => {
                    info!("Successfully connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection. Retry in 1 sec. Start without DATABASE_URL to keep bookings in memory.");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(backend, payment_client, configuration)
    } else {
        info!("No database configured, bookings are kept in memory");
        create_app(LocalBookings::default(), payment_client, configuration)
    };

    if let Err(err) = axum::serve(listener, app).await {
        error!(?err, "Server stopped");
        std::process::exit(1);
    }
}
