//! Data model of a recurring silence request and of one orchestration run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error_handling::types::WindowError;

/// Lower bound (exclusive) of `Repeat::count`.
pub const REPEAT_COUNT_MIN: i64 = 0;
/// Upper bound (inclusive) of `Repeat::count`.
pub const REPEAT_COUNT_MAX: i64 = 50;

/// Layout every request timestamp must follow: UTC, millisecond precision.
pub const REQUEST_TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A label condition selecting which alerts a silence applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "isRegex")]
    pub is_regex: bool,
}

impl Matcher {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V, is_regex: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_regex,
        }
    }
}

/// Repeat specification. `interval` is kept as the raw code ("", "h", "d", "w")
/// so that an unknown code can be reported by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub count: i64,
}

impl Repeat {
    pub fn is_empty(&self) -> bool {
        *self == Repeat::default()
    }

    /// Number of windows this repeat expands to. Non-positive counts yield none.
    pub fn window_count(&self) -> usize {
        usize::try_from(self.count).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, rename = "start_time")]
    pub start_time: String,
    #[serde(default, rename = "end_time")]
    pub end_time: String,
    #[serde(default)]
    pub repeat: Repeat,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        *self == Schedule::default()
    }
}

/// The unit of validation: one silence definition plus its schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilenceRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, rename = "createdBy")]
    pub created_by: String,
    #[serde(default)]
    pub matchers: Vec<Matcher>,
    #[serde(default)]
    pub schedule: Schedule,
}

/// One concrete period to silence, produced by window expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilenceWindow {
    pub index: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Result of a single window inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOutcome {
    pub index: usize,
    pub result: Result<String, WindowError>,
}

/// Aggregated output of one orchestration run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestrationResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed_indices: Vec<usize>,
    pub created_ids: Vec<String>,
    pub outcomes: Vec<WindowOutcome>,
}

impl OrchestrationResult {
    /// Folds the ordered per-window outcomes into the aggregate counts.
    pub fn from_outcomes(outcomes: Vec<WindowOutcome>) -> Self {
        let mut failed_indices = Vec::new();
        let mut created_ids = Vec::new();
        for outcome in &outcomes {
            match &outcome.result {
                Ok(id) => created_ids.push(id.clone()),
                Err(_) => failed_indices.push(outcome.index),
            }
        }

        let attempted = outcomes.len();
        Self {
            attempted,
            succeeded: attempted - failed_indices.len(),
            failed_indices,
            created_ids,
            outcomes,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed_indices.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("{}/{} new silences created", self.succeeded, self.attempted)
    }
}
