//! Webhook delivery.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::app::{FeedhookError, Result};
use crate::config::Settings;
use crate::domain::Payload;

#[async_trait]
pub trait Notifier {
    /// Deliver one payload. A non-OK response is [`FeedhookError::DeliveryStatus`].
    async fn notify(&self, payload: &Payload) -> Result<()>;
}

/// Posts `{"text": ...}` to an incoming webhook.
pub struct WebhookNotifier {
    client: Client,
    endpoint: Option<String>,
}

impl WebhookNotifier {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self::with_client(client, settings.webhook_url.clone()))
    }

    pub fn with_client(client: Client, endpoint: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, payload: &Payload) -> Result<()> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            FeedhookError::Config(format!(
                "{} is not set",
                crate::config::WEBHOOK_URL_ENV
            ))
        })?;

        let response = self
            .client
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(FeedhookError::DeliveryTransport)?;

        if response.status() != StatusCode::OK {
            return Err(FeedhookError::DeliveryStatus(response.status().as_u16()));
        }

        Ok(())
    }
}
