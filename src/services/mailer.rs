use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Mail relay rejected request: {0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Outbound mail boundary. Accepts a template name, the recipient's user
/// id, and an arbitrary JSON payload; rendering and delivery happen in the
/// relay. Delivery failures are signaled, never retried here.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn enqueue(&self, template: &str, recipient: Uuid, payload: Value) -> Result<(), MailerError>;
}

/// Posts messages to the configured HTTP mail relay.
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
    from_address: String,
}

impl HttpMailer {
    pub fn from_config() -> Self {
        let mail = &config::config().mail;
        Self {
            client: reqwest::Client::new(),
            relay_url: mail.relay_url.clone(),
            from_address: mail.from_address.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn enqueue(&self, template: &str, recipient: Uuid, payload: Value) -> Result<(), MailerError> {
        let response = self
            .client
            .post(&self.relay_url)
            .json(&json!({
                "template": template,
                "recipient_id": recipient,
                "from": self.from_address,
                "payload": payload,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailerError::Rejected(response.status().to_string()));
        }

        tracing::debug!(template, %recipient, "mail enqueued");
        Ok(())
    }
}

/// Drops messages. Used when mail is disabled (development, tests).
pub struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn enqueue(&self, template: &str, recipient: Uuid, _payload: Value) -> Result<(), MailerError> {
        tracing::debug!(template, %recipient, "mail disabled, dropping message");
        Ok(())
    }
}

static MAILER: Lazy<Arc<dyn Mailer>> = Lazy::new(|| {
    if config::config().mail.enabled {
        Arc::new(HttpMailer::from_config())
    } else {
        Arc::new(NullMailer)
    }
});

pub fn mailer() -> Arc<dyn Mailer> {
    MAILER.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_mailer_accepts_everything() {
        let result = NullMailer
            .enqueue("season_welcome", Uuid::new_v4(), json!({"season": 2026}))
            .await;
        assert!(result.is_ok());
    }
}
