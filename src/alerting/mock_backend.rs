//! Recording in-memory backend for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::backend::AlertingBackend;
use super::types::{Alert, Silence, SilenceStatus};
use crate::error_handling::types::BackendError;
use crate::silence::types::SilenceRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListAlerts,
    Create {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Get(String),
    List,
    Expire(String),
}

#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<Call>>,
    creates: Mutex<usize>,
    fail_creates: Vec<usize>,
    fail_expire: Option<BackendError>,
    silences: Vec<Silence>,
    alerts: Vec<Alert>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the n-th (0-based) call to `create_silence` fail.
    pub fn failing_creates(mut self, indices: &[usize]) -> Self {
        self.fail_creates = indices.to_vec();
        self
    }

    pub fn failing_expire(mut self, err: BackendError) -> Self {
        self.fail_expire = Some(err);
        self
    }

    pub fn with_silences(mut self, states: &[(&str, &str)]) -> Self {
        self.silences = states
            .iter()
            .map(|(id, state)| Silence {
                id: id.to_string(),
                status: SilenceStatus { state: state.to_string() },
                ..Default::default()
            })
            .collect();
        self
    }

    pub fn with_alerts(mut self, alerts: Vec<Alert>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create { start, end } => Some((start, end)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AlertingBackend for MockBackend {
    async fn list_alerts(&self) -> Result<Vec<Alert>, BackendError> {
        self.record(Call::ListAlerts);
        Ok(self.alerts.clone())
    }

    async fn create_silence(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _request: &SilenceRequest,
    ) -> Result<String, BackendError> {
        self.record(Call::Create { start, end });
        let n = {
            let mut creates = self.creates.lock().unwrap();
            *creates += 1;
            *creates - 1
        };
        if self.fail_creates.contains(&n) {
            return Err(BackendError::HttpStatus {
                code: 500,
                body: format!("create {} refused", n),
            });
        }
        Ok(format!("silence-{}", n))
    }

    async fn get_silence(&self, id: &str) -> Result<Silence, BackendError> {
        self.record(Call::Get(id.to_string()));
        self.silences
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(BackendError::HttpStatus {
                code: 404,
                body: String::new(),
            })
    }

    async fn list_silences(&self) -> Result<Vec<Silence>, BackendError> {
        self.record(Call::List);
        Ok(self.silences.clone())
    }

    async fn expire_silence(&self, id: &str) -> Result<(), BackendError> {
        self.record(Call::Expire(id.to_string()));
        match &self.fail_expire {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
