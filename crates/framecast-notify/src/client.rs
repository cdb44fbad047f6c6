//! HTTP client for the push gateway.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use framecast_core::MediaType;

use crate::message::{gateway_accepted, MediaNotificationOptions, PushMessage};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to build push client: {0}")]
    Config(String),

    #[error("Push gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Push gateway returned status {0}")]
    GatewayStatus(u16),
}

/// Client for a push-delivery gateway.
#[derive(Clone)]
pub struct PushClient {
    client: Client,
    gateway_url: String,
}

impl PushClient {
    pub fn new(gateway_url: String, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Config(e.to_string()))?;
        Ok(Self {
            client,
            gateway_url,
        })
    }

    /// Announce a new media item to the device behind `token`.
    ///
    /// `Ok(true)` means the gateway accepted the message. `Ok(false)` means
    /// the HTTP exchange succeeded but the gateway rejected this recipient;
    /// the rejection is logged, not raised. Transport and status failures
    /// are typed errors for the caller to interpret.
    #[tracing::instrument(skip(self, opts), fields(media_url = %media_url))]
    pub async fn send_media_notification(
        &self,
        token: &str,
        media_url: &str,
        media_type: MediaType,
        opts: MediaNotificationOptions,
    ) -> Result<bool, NotifyError> {
        let message = PushMessage::media(token, media_url, media_type, opts);
        self.dispatch(&message).await
    }

    /// Maximum-urgency wake attempt. Success reflects gateway acceptance
    /// only, never an actual device wake.
    #[tracing::instrument(skip(self))]
    pub async fn send_urgent_notification(
        &self,
        token: &str,
        title: &str,
        body: &str,
    ) -> Result<bool, NotifyError> {
        let message = PushMessage::urgent(token, title, body);
        self.dispatch(&message).await
    }

    async fn dispatch(&self, message: &PushMessage) -> Result<bool, NotifyError> {
        let response = self
            .client
            .post(&self.gateway_url)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                gateway = %self.gateway_url,
                "Push gateway rejected the request"
            );
            return Err(NotifyError::GatewayStatus(status.as_u16()));
        }

        let body: Value = response.json().await?;
        match gateway_accepted(&body) {
            Ok(()) => {
                tracing::info!(title = %message.title, "Push notification accepted by gateway");
                Ok(true)
            }
            Err(reason) => {
                tracing::warn!(
                    reason = %reason,
                    title = %message.title,
                    "Push gateway rejected the message"
                );
                Ok(false)
            }
        }
    }
}
