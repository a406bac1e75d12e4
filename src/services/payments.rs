use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment processor rejected request: {0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Intent created at the processor; the client secret goes back to the
/// browser to complete the charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub intent_id: String,
    pub client_secret: String,
    pub status: String,
}

/// Thin client for the payment processor's HTTP API. Scoping metadata
/// (user, season) rides along on every intent; retry and backoff policy
/// belong to the processor SDK contract, not here.
pub struct PaymentClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PaymentClient {
    pub fn from_config() -> Self {
        let integrations = &config::config().integrations;
        Self {
            client: reqwest::Client::new(),
            base_url: integrations.payments_url.clone(),
            api_key: integrations.payments_api_key.clone(),
        }
    }

    pub async fn create_intent(
        &self,
        user_id: Uuid,
        season_id: Uuid,
        amount: Decimal,
    ) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .client
            .post(format!("{}/v1/intents", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "amount": amount,
                "currency": "usd",
                "metadata": {
                    "user_id": user_id,
                    "season_id": season_id,
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PaymentError::Rejected(response.status().to_string()));
        }

        Ok(response.json().await?)
    }
}
