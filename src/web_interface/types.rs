use serde::Serialize;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Response envelope of every API call that is not a plain listing.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    #[serde(rename = "silenceIDs", skip_serializing_if = "Option::is_none")]
    pub silence_ids: Option<Vec<String>>,
}

impl ApiResponse {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
            silence_ids: None,
        }
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
            silence_ids: None,
        }
    }

    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.silence_ids = Some(ids);
        self
    }
}
