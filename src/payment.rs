use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::BookingError;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentRequest {
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub service_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

impl PaymentIntent {
    pub fn succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

/// Payment provider used for add-on services. Constructed once at startup and
/// handed to the router.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentClient: Send + Sync {
    async fn create_intent(&self, request: PaymentIntentRequest) -> Result<PaymentIntent, BookingError>;
    async fn confirm_intent(&self, payment_intent_id: String) -> Result<PaymentIntent, BookingError>;
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct StripePaymentClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripePaymentClient {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    async fn into_intent(response: reqwest::Response) -> Result<PaymentIntent, BookingError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<PaymentIntent>()
                .await
                .map_err(|err| BookingError::Payment(format!("Malformed provider response: {err}")));
        }

        let message = match response.json::<StripeErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("Provider responded with {status}"),
        };
        error!(%status, reason = %message, "Payment provider rejected request");
        Err(BookingError::Payment(message))
    }
}

#[async_trait]
impl PaymentClient for StripePaymentClient {
    async fn create_intent(&self, request: PaymentIntentRequest) -> Result<PaymentIntent, BookingError> {
        let service_ids = request
            .service_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let form = [
            ("amount", request.amount.to_string()),
            ("currency", request.currency),
            ("description", request.description),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("metadata[serviceIds]", service_ids),
        ];

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|err| BookingError::Payment(err.to_string()))?;

        let intent = Self::into_intent(response).await?;
        info!(id = %intent.id, amount = intent.amount, "Payment intent created");
        Ok(intent)
    }

    async fn confirm_intent(&self, payment_intent_id: String) -> Result<PaymentIntent, BookingError> {
        let response = self
            .http
            .get(format!(
                "{}/v1/payment_intents/{payment_intent_id}",
                self.api_base
            ))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|err| BookingError::Payment(err.to_string()))?;

        Self::into_intent(response).await
    }
}
