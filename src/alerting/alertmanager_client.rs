//! HTTP client for the Alertmanager v2 API.
//!
//! Implements [`AlertingBackend`] with plain JSON requests over `reqwest`.
//! Every call is a single attempt bounded by the configured timeout; retries
//! are left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;

use super::backend::AlertingBackend;
use super::types::{Alert, PostableSilence, Silence, SilenceCreated};
use crate::configuration::types::ClientConfig;
use crate::error_handling::types::BackendError;
use crate::silence::types::SilenceRequest;
use crate::silence::window::format_timestamp;

pub struct AlertmanagerClient {
    api_url: Url,
    http: Client,
}

impl AlertmanagerClient {
    /// Creates a client for the API rooted at `api_url`
    /// (e.g. `http://localhost:9093/api/v2`).
    pub fn new(api_url: &str, config: &ClientConfig) -> Result<Self, BackendError> {
        let api_url =
            Url::parse(api_url).map_err(|e| BackendError::InvalidUrl(format!("{}: {}", api_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        info!("Alertmanager client targeting {}", api_url);
        Ok(Self { api_url, http })
    }

    /// Joins `segments` onto the API base path, collapsing repeated slashes.
    pub fn construct_url(&self, segments: &[&str]) -> Url {
        let path: Vec<&str> = self
            .api_url
            .path()
            .split('/')
            .chain(segments.iter().flat_map(|s| s.split('/')))
            .filter(|s| !s.is_empty())
            .collect();

        let mut url = self.api_url.clone();
        url.set_path(&format!("/{}", path.join("/")));
        url
    }

    async fn do_request(
        &self,
        method: Method,
        url: Url,
        body: Option<&PostableSilence>,
    ) -> Result<String, BackendError> {
        debug!("{} {}", method, url);
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.as_u16() >= 400 {
            return Err(BackendError::HttpStatus {
                code: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, BackendError> {
        let body = self
            .do_request(Method::GET, self.construct_url(segments), None)
            .await?;
        serde_json::from_str(&body).map_err(|e| BackendError::DecodeFailed(e.to_string()))
    }
}

#[async_trait]
impl AlertingBackend for AlertmanagerClient {
    async fn list_alerts(&self) -> Result<Vec<Alert>, BackendError> {
        self.get_json(&["alerts"]).await
    }

    async fn create_silence(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        request: &SilenceRequest,
    ) -> Result<String, BackendError> {
        let silence = PostableSilence {
            matchers: request.matchers.clone(),
            starts_at: format_timestamp(&start),
            ends_at: format_timestamp(&end),
            created_by: request.created_by.clone(),
            comment: request.comment.clone(),
        };

        let body = self
            .do_request(Method::POST, self.construct_url(&["silences"]), Some(&silence))
            .await?;
        let created: SilenceCreated =
            serde_json::from_str(&body).map_err(|e| BackendError::DecodeFailed(e.to_string()))?;

        if let Some(code) = created.code {
            return Err(BackendError::Rejected {
                code,
                message: created.message,
            });
        }
        Ok(created.silence_id)
    }

    async fn get_silence(&self, id: &str) -> Result<Silence, BackendError> {
        self.get_json(&["silence", id]).await
    }

    async fn list_silences(&self) -> Result<Vec<Silence>, BackendError> {
        self.get_json(&["silences"]).await
    }

    async fn expire_silence(&self, id: &str) -> Result<(), BackendError> {
        self.do_request(Method::DELETE, self.construct_url(&["silence", id]), None)
            .await?;
        Ok(())
    }
}
