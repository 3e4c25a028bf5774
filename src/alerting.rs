//! Alerting backend subsystem
//!
//! Components:
//! - `backend`: the `AlertingBackend` trait the scheduler depends on.
//! - `types`: silences and alerts as the backend reports them.
//! - `alertmanager_client`: `reqwest` implementation against Alertmanager API v2.

pub mod alertmanager_client;
pub mod backend;
#[cfg(test)]
pub mod mock_backend;
pub mod types;

pub use alertmanager_client::AlertmanagerClient;
pub use backend::AlertingBackend;
pub use types::{Alert, Silence, SilenceStatus};
