use std::sync::Arc;

use log::{debug, error, info, warn};

use super::filter::filter_expired;
use super::types::{OrchestrationResult, SilenceRequest, WindowOutcome};
use super::validator::validate;
use super::window::{expand, parse_timestamp};
use crate::alerting::backend::AlertingBackend;
use crate::alerting::types::{Alert, Silence};
use crate::error_handling::types::{SchedulerError, ValidationError, WindowError};

/// Drives recurring silence creation against an alerting backend.
///
/// The backend is injected at construction; the orchestrator itself holds no
/// other state, so one instance can serve concurrent callers.
///
/// # Fields Overview
///
/// - `backend`: the system of record every silence is created in, read from
///   and expired through
#[derive(Clone)]
pub struct SilenceOrchestrator {
    backend: Arc<dyn AlertingBackend>,
}

impl SilenceOrchestrator {
    pub fn new(backend: Arc<dyn AlertingBackend>) -> Self {
        Self { backend }
    }

    /// Validates `request`, expands its schedule and creates one silence per
    /// window, strictly one after the other.
    ///
    /// A rejected request returns before any backend call. Once windows are
    /// being created, a failing window is recorded and the loop moves on;
    /// silences already created are never rolled back.
    pub async fn run(&self, request: &SilenceRequest) -> Result<OrchestrationResult, ValidationError> {
        validate(request)?;

        let mut outcomes = Vec::with_capacity(request.schedule.repeat.window_count());
        for (index, window) in expand(&request.schedule).enumerate() {
            let result = match window {
                Ok(window) => {
                    debug!(
                        "Creating silence {} of {} ({} -> {}) for '{}'",
                        index + 1,
                        request.schedule.repeat.count,
                        window.start,
                        window.end,
                        request.comment
                    );
                    self.backend
                        .create_silence(window.start, window.end, request)
                        .await
                        .map_err(WindowError::from)
                }
                Err(e) => Err(WindowError::from(e)),
            };

            if let Err(ref e) = result {
                warn!("Silence window {} could not be created: {}", index, e);
            }
            outcomes.push(WindowOutcome { index, result });
        }

        let result = OrchestrationResult::from_outcomes(outcomes);
        info!("{}", result.summary());
        Ok(result)
    }

    /// Replaces silence `id` by expiring it and creating a new one over
    /// `[new_start, new_end]`.
    ///
    /// Not atomic. A failed expiry is returned unchanged and nothing is
    /// created. If creation fails after a successful expiry, the old silence
    /// stays expired with no replacement and the creation error is returned.
    pub async fn update(
        &self,
        id: &str,
        new_start: &str,
        new_end: &str,
        request: &SilenceRequest,
    ) -> Result<String, SchedulerError> {
        let start = parse_timestamp(new_start)?;
        let end = parse_timestamp(new_end)?;

        self.backend.expire_silence(id).await?;

        match self.backend.create_silence(start, end, request).await {
            Ok(new_id) => {
                info!("Silence {} replaced by {}", id, new_id);
                Ok(new_id)
            }
            Err(e) => {
                error!(
                    "Silence {} was expired but its replacement failed, no silence is active: {}",
                    id, e
                );
                Err(SchedulerError::Backend(e))
            }
        }
    }

    pub async fn list_alerts(&self) -> Result<Vec<Alert>, SchedulerError> {
        Ok(self.backend.list_alerts().await?)
    }

    /// Lists silences; with `filtered` set, expired ones are left out.
    pub async fn list_silences(&self, filtered: bool) -> Result<Vec<Silence>, SchedulerError> {
        let silences = self.backend.list_silences().await?;
        if filtered {
            return Ok(filter_expired(silences));
        }
        Ok(silences)
    }

    pub async fn get_silence(&self, id: &str) -> Result<Silence, SchedulerError> {
        Ok(self.backend.get_silence(id).await?)
    }

    pub async fn expire_silence(&self, id: &str) -> Result<(), SchedulerError> {
        self.backend.expire_silence(id).await?;
        info!("Expired silence {}", id);
        Ok(())
    }
}
