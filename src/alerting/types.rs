//! Backend-owned entities as Alertmanager's v2 API exposes them.
//!
//! Field names follow the API's camelCase so these pass straight through to
//! the web layer. Timestamps are kept as strings: the backend may return any
//! RFC 3339 offset and the scheduler never computes with them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::silence::types::Matcher;

pub const SILENCE_STATE_EXPIRED: &str = "expired";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilenceStatus {
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Silence {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: SilenceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub matchers: Vec<Matcher>,
    #[serde(default)]
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub comment: String,
}

impl Silence {
    pub fn is_expired(&self) -> bool {
        self.status.state == SILENCE_STATE_EXPIRED
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    #[serde(default)]
    pub inhibited_by: Vec<String>,
    #[serde(default)]
    pub silenced_by: Vec<String>,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub ends_at: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub receivers: Vec<Receiver>,
    #[serde(default)]
    pub starts_at: String,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, rename = "generatorURL", skip_serializing_if = "Option::is_none")]
    pub generator_url: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Body of `POST /silences`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostableSilence {
    pub matchers: Vec<Matcher>,
    pub starts_at: String,
    pub ends_at: String,
    pub created_by: String,
    pub comment: String,
}

/// Answer of `POST /silences`. A present `code` means the backend refused.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SilenceCreated {
    #[serde(default, rename = "silenceID")]
    pub silence_id: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}
