//! Webhook event model and body decoding.

use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::ParseError;
use crate::wire::{WireId, id_string};

/// Kind of resource a notification is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    Payment,
    Plan,
    Subscription,
    Invoice,
    PointIntegrationWh,
    Delivery,
    Customer,
    /// Any topic this crate does not model, kept verbatim
    Other(String),
}

impl Topic {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Payment => "payment",
            Self::Plan => "plan",
            Self::Subscription => "subscription",
            Self::Invoice => "invoice",
            Self::PointIntegrationWh => "point_integration_wh",
            Self::Delivery => "delivery",
            Self::Customer => "customer",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        match name {
            "payment" => Self::Payment,
            "plan" => Self::Plan,
            "subscription" => Self::Subscription,
            "invoice" => Self::Invoice,
            "point_integration_wh" => Self::PointIntegrationWh,
            "delivery" => Self::Delivery,
            "customer" => Self::Customer,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A decoded webhook notification.
///
/// Built fresh for each delivery and handed to the caller; nothing is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookEvent {
    pub id: String,
    pub topic: Topic,
    /// Id of the referenced resource, from `data.id`
    pub resource_id: String,
    pub resource_url: String,
    pub action: String,
    pub api_version: String,
    /// RFC 3339 timestamp; the decode time when the body has none
    pub created_at: String,
    pub live_mode: bool,
}

#[derive(Deserialize)]
struct WireEvent {
    id: Option<WireId>,
    topic: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    data: Option<WireData>,
    resource: Option<String>,
    action: Option<String>,
    api_version: Option<String>,
    date_created: Option<String>,
    live_mode: Option<bool>,
}

#[derive(Deserialize)]
struct WireData {
    id: Option<WireId>,
}

/// Decodes a raw body into an event.
///
/// `topic` falls back to `type`; missing `date_created` becomes `now`;
/// `live_mode` defaults to false and `api_version` to `v1`.
///
/// # Errors
///
/// Returns [`ParseError`] if the body is not UTF-8, not JSON, valid JSON
/// that is not an object, or an object that names no topic.
pub fn decode_event(raw_body: &[u8], now: SystemTime) -> Result<WebhookEvent, ParseError> {
    let text = std::str::from_utf8(raw_body)?;
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ParseError::NotAnObject);
    }
    let wire: WireEvent = serde_json::from_value(value)?;

    let topic = wire
        .topic
        .filter(|t| !t.is_empty())
        .or_else(|| wire.kind.filter(|t| !t.is_empty()))
        .ok_or(ParseError::MissingTopic)?;

    Ok(WebhookEvent {
        id: id_string(wire.id),
        topic: Topic::from(topic.as_str()),
        resource_id: id_string(wire.data.and_then(|d| d.id)),
        resource_url: wire.resource.unwrap_or_default(),
        action: wire.action.unwrap_or_default(),
        api_version: wire.api_version.unwrap_or_else(|| "v1".to_string()),
        created_at: wire
            .date_created
            .unwrap_or_else(|| DateTime::<Utc>::from(now).to_rfc3339_opts(SecondsFormat::Millis, true)),
        live_mode: wire.live_mode.unwrap_or(false),
    })
}
