//! Alertmanager webhook payload and its decoder.
//!
//! Every field is optional on the wire: a missing key or an explicit `null`
//! decodes to the empty/zero value and unknown keys are ignored. Only
//! malformed JSON or a value of the wrong type is rejected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid alert group payload: {0}")]
    Json(#[from] serde_json::Error),
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Status of an alert group or of a single alert.
///
/// Anything other than `firing`/`resolved` keeps its raw value in `Other`;
/// a missing status is `Other("")`. Ordering is firing, resolved, then
/// other statuses by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlertStatus {
    Firing,
    Resolved,
    Other(String),
}

impl Default for AlertStatus {
    fn default() -> Self {
        AlertStatus::Other(String::new())
    }
}

impl AlertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for AlertStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "firing" => AlertStatus::Firing,
            "resolved" => AlertStatus::Resolved,
            _ => AlertStatus::Other(raw),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AlertStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AlertStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = null_as_default(deserializer)?;
        Ok(AlertStatus::from(raw))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupLabels {
    #[serde(deserialize_with = "null_as_default")]
    pub alertname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonAnnotations {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertAnnotations {
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

/// One webhook call from Alertmanager.
///
/// See <https://prometheus.io/docs/alerting/latest/configuration/#webhook_config>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertGroupNotification {
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub group_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub truncated_alerts: u64,
    #[serde(alias = "alertStatus")]
    pub status: AlertStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver: String,
    #[serde(deserialize_with = "null_as_default")]
    pub group_labels: GroupLabels,
    #[serde(deserialize_with = "null_as_default")]
    pub common_labels: GroupLabels,
    #[serde(deserialize_with = "null_as_default")]
    pub common_annotations: CommonAnnotations,
    #[serde(rename = "externalURL", deserialize_with = "null_as_default")]
    pub external_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Alert {
    pub status: AlertStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub annotations: AlertAnnotations,
    #[serde(deserialize_with = "null_as_default")]
    pub starts_at: String,
    /// Empty while the alert is still firing.
    #[serde(deserialize_with = "null_as_default")]
    pub ends_at: String,
    #[serde(rename = "generatorURL", deserialize_with = "null_as_default")]
    pub generator_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fingerprint: String,
}

impl Alert {
    pub fn alert_name(&self) -> Option<&str> {
        self.labels.get("alertname").map(String::as_str)
    }
}

impl AlertGroupNotification {
    /// Number of alerts carrying each status, in status order.
    pub fn count_by_status(&self) -> Vec<(AlertStatus, usize)> {
        let mut counts: Vec<(AlertStatus, usize)> = Vec::new();
        for alert in &self.alerts {
            match counts.iter_mut().find(|(status, _)| *status == alert.status) {
                Some((_, count)) => *count += 1,
                None => counts.push((alert.status.clone(), 1)),
            }
        }
        counts.sort_by(|(a, _), (b, _)| a.cmp(b));
        counts
    }
}

/// Decode a raw request body into an [`AlertGroupNotification`].
pub fn decode(body: &[u8]) -> Result<AlertGroupNotification, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}
