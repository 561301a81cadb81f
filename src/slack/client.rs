use crate::error::{ForwarderError, Result};
use crate::slack::{OutboundNotification, WebhookMessage};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

/// Something that can deliver a rendered notification
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn deliver(&self, notification: &OutboundNotification) -> Result<()>;

    /// Destination URL; only its host is ever logged
    fn endpoint(&self) -> &Url;
}

/// Posts notifications to a Slack incoming webhook
pub struct WebhookClient {
    http_client: Client,
    webhook_url: Url,
}

impl WebhookClient {
    pub fn new(webhook_url: Url, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            webhook_url,
        })
    }

    pub fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }
}

#[async_trait]
impl WebhookTransport for WebhookClient {
    async fn deliver(&self, notification: &OutboundNotification) -> Result<()> {
        let message = WebhookMessage::single(notification.clone());

        let response = self
            .http_client
            .post(self.webhook_url.clone())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Webhook accepted notification");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        Err(ForwarderError::Delivery(format!(
            "webhook returned {}: {}",
            status, body
        )))
    }

    fn endpoint(&self) -> &Url {
        &self.webhook_url
    }
}
