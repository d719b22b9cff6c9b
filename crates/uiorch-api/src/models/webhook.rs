use serde::{Deserialize, Serialize};
use url::Url;

use super::Extra;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebhookEventSubscription {
    pub event_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Webhook {
    pub id: i64,
    pub key: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub enabled: bool,
    pub subscribe_to_all_events: Option<bool>,
    pub allow_insecure_ssl: Option<bool>,
    #[serde(default)]
    pub events: Vec<WebhookEventSubscription>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating or replacing a webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewWebhook {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub enabled: bool,
    /// Shared secret used to sign deliveries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub subscribe_to_all_events: bool,
    pub allow_insecure_ssl: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<WebhookEventSubscription>,
}

impl NewWebhook {
    /// An enabled webhook subscribed to every event.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            url: url.into(),
            enabled: true,
            secret: None,
            subscribe_to_all_events: true,
            allow_insecure_ssl: false,
            events: Vec::new(),
        }
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Subscribe only to the listed event types.
    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events
            .into_iter()
            .map(|e| WebhookEventSubscription {
                event_type: e.into(),
            })
            .collect();
        self.subscribe_to_all_events = self.events.is_empty();
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        if self.url.trim().is_empty() {
            return Err(Error::validation("url", "must not be empty"));
        }
        Url::parse(&self.url).map_err(|e| Error::validation("url", e.to_string()))?;
        Ok(())
    }
}

/// An event type that webhooks can subscribe to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebhookEventType {
    pub name: String,
    pub group: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Payload of a webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebhookEvent {
    #[serde(rename = "Type")]
    pub event_type: String,
    pub event_id: String,
    pub timestamp: Option<String>,
    pub tenant_id: Option<i64>,
    pub organization_unit_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}
