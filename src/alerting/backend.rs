//! Alerting Backend Trait
//!
//! The scheduler never talks to the network itself. Everything it needs from
//! the system of record for alerts and silences goes through this trait, which
//! is handed to it explicitly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{Alert, Silence};
use crate::error_handling::types::BackendError;
use crate::silence::types::SilenceRequest;

#[async_trait]
pub trait AlertingBackend: Send + Sync {
    async fn list_alerts(&self) -> Result<Vec<Alert>, BackendError>;

    /// Creates one silence covering `[start, end]` and returns its identifier.
    /// Not idempotent: every call creates a new silence.
    async fn create_silence(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        request: &SilenceRequest,
    ) -> Result<String, BackendError>;

    async fn get_silence(&self, id: &str) -> Result<Silence, BackendError>;

    async fn list_silences(&self) -> Result<Vec<Silence>, BackendError>;

    /// Fails when the silence is already expired or unknown to the backend.
    async fn expire_silence(&self, id: &str) -> Result<(), BackendError>;
}
