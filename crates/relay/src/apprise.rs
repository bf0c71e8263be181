//! Apprise API notification payload and delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Apprise responded with status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    #[default]
    Text,
    Markdown,
    Html,
}

/// Body of a `POST /notify` call to an Apprise API server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(default)]
    pub format: MessageFormat,
}

/// Delivers rendered messages downstream.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// Posts messages as JSON to a fixed Apprise endpoint.
pub struct AppriseClient {
    url: String,
    client: reqwest::Client,
}

impl AppriseClient {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, DeliveryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            url: url.into(),
            client: builder.build()?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for AppriseClient {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let response = self.client.post(&self.url).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(url = %self.url, status = status.as_u16(), "Notification delivered");
        Ok(())
    }
}
