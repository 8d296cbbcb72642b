use crate::configuration::Configuration;
use clap::{builder::NonEmptyStringValueParser, Parser};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Yacht club booking service")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value = "3000")]
    port: String,

    /// PostgreSQL connection URL. Bookings are kept in memory when unset.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Password expected in the `x-admin-password` header of admin routes
    #[arg(long, env = "ADMIN_PASSWORD", value_parser = NonEmptyStringValueParser::new())]
    admin_password: String,

    #[arg(long, env = "STRIPE_SECRET_KEY", default_value = "")]
    stripe_secret_key: String,

    #[arg(long, env = "STRIPE_API_BASE", default_value = "https://api.stripe.com")]
    stripe_api_base: String,

    #[arg(long, env = "PAYMENT_CURRENCY", default_value = "usd")]
    currency: String,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        // A missing .env file is fine, the environment may be set directly
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn admin_password(&self) -> String {
        self.admin_password.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    fn stripe_secret_key(&self) -> String {
        self.stripe_secret_key.clone()
    }

    fn stripe_api_base(&self) -> String {
        self.stripe_api_base.clone()
    }

    fn currency(&self) -> String {
        self.currency.clone()
    }
}
