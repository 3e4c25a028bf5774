use std::fmt;

use crate::silence::types::{REPEAT_COUNT_MAX, REPEAT_COUNT_MIN};

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    MissingField(String),
    InvalidUrl(String),
    BadIPFormatting(String),
    NotInRange(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::MissingField(e) => write!(f, "Missing configuration field: {}", e),
            ConfigError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
            ConfigError::BadIPFormatting(e) => write!(f, "IP formatting error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Reasons a silence request is rejected before any backend call.
///
/// The `Display` output is the human-readable reason surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyComment,
    EmptyCreatedBy,
    NoMatchers,
    InvalidMatcher(String),
    EmptySchedule,
    InvalidStartTime,
    InvalidEndTime,
    EmptyRepeat,
    CountTooLow,
    CountTooHigh,
    UnknownInterval,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyComment => write!(f, "comment field empty"),
            ValidationError::EmptyCreatedBy => write!(f, "createdBy field empty"),
            ValidationError::NoMatchers => {
                write!(f, "number of matchers should be bigger than 0")
            }
            ValidationError::InvalidMatcher(m) => write!(f, "matcher '{}' is invalid", m),
            ValidationError::EmptySchedule => write!(f, "empty schedule provided"),
            ValidationError::InvalidStartTime => write!(f, "invalid start time format"),
            ValidationError::InvalidEndTime => write!(f, "invalid end time format"),
            ValidationError::EmptyRepeat => write!(f, "schedule repeat is empty"),
            ValidationError::CountTooLow => {
                write!(f, "repeat count must be higher than {}", REPEAT_COUNT_MIN)
            }
            ValidationError::CountTooHigh => write!(
                f,
                "repeat count must be lower than or equal to {}",
                REPEAT_COUNT_MAX
            ),
            ValidationError::UnknownInterval => write!(f, "unknown schedule interval provided"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeParseError {
    Malformed { input: String, reason: String },
    OutOfRange { input: String },
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeParseError::Malformed { input, reason } => {
                write!(f, "unable to parse timestamp '{}': {}", input, reason)
            }
            TimeParseError::OutOfRange { input } => {
                write!(f, "timestamp '{}' shifted out of range", input)
            }
        }
    }
}

impl std::error::Error for TimeParseError {}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    InvalidUrl(String),
    RequestFailed(String),
    HttpStatus { code: u16, body: String },
    DecodeFailed(String),
    Rejected { code: i64, message: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::InvalidUrl(e) => write!(f, "invalid Alertmanager URL: {}", e),
            BackendError::RequestFailed(e) => write!(f, "unable to get response: {}", e),
            BackendError::HttpStatus { code, body } if body.is_empty() => {
                write!(f, "Alertmanager returned an HTTP error code: {}", code)
            }
            BackendError::HttpStatus { code, body } => write!(
                f,
                "Alertmanager returned an HTTP error code: {} ({})",
                code,
                body.trim()
            ),
            BackendError::DecodeFailed(e) => write!(f, "unable to unmarshal body: {}", e),
            BackendError::Rejected { code, message } => {
                write!(f, "unable to create silence: '{} {}'", code, message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::DecodeFailed(err.to_string())
        } else {
            BackendError::RequestFailed(err.to_string())
        }
    }
}

/// Failure of a single window inside a batch; recorded, never raised.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowError {
    Time(TimeParseError),
    Backend(BackendError),
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::Time(e) => write!(f, "window time error: {}", e),
            WindowError::Backend(e) => write!(f, "window backend error: {}", e),
        }
    }
}

impl std::error::Error for WindowError {}

impl From<TimeParseError> for WindowError {
    fn from(err: TimeParseError) -> Self {
        WindowError::Time(err)
    }
}

impl From<BackendError> for WindowError {
    fn from(err: BackendError) -> Self {
        WindowError::Backend(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerError {
    Validation(ValidationError),
    Time(TimeParseError),
    Backend(BackendError),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::Validation(e) => write!(f, "silence request is invalid: {}", e),
            SchedulerError::Time(e) => write!(f, "{}", e),
            SchedulerError::Backend(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SchedulerError {}

impl From<ValidationError> for SchedulerError {
    fn from(err: ValidationError) -> Self {
        SchedulerError::Validation(err)
    }
}

impl From<TimeParseError> for SchedulerError {
    fn from(err: TimeParseError) -> Self {
        SchedulerError::Time(err)
    }
}

impl From<BackendError> for SchedulerError {
    fn from(err: BackendError) -> Self {
        SchedulerError::Backend(err)
    }
}

#[derive(Debug)]
pub enum WebError {
    BindFailed(String),
    AssetMissing(String),
    FormDecode(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BindFailed(e) => write!(f, "Web server bind failed: {}", e),
            WebError::AssetMissing(e) => write!(f, "Embedded asset missing: {}", e),
            WebError::FormDecode(e) => write!(f, "unable to read silence request: {}", e),
        }
    }
}

impl std::error::Error for WebError {}

#[derive(Debug)]
pub enum ControllerError {
    ConfigurationError(ConfigError),
    BackendError(BackendError),
    WebError(WebError),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            ControllerError::BackendError(e) => write!(f, "Backend error: {}", e),
            ControllerError::WebError(e) => write!(f, "Web error: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::ConfigurationError(err)
    }
}

impl From<BackendError> for ControllerError {
    fn from(err: BackendError) -> Self {
        ControllerError::BackendError(err)
    }
}

impl From<WebError> for ControllerError {
    fn from(err: WebError) -> Self {
        ControllerError::WebError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reasons_match_caller_facing_text() {
        assert_eq!(ValidationError::EmptyComment.to_string(), "comment field empty");
        assert_eq!(ValidationError::EmptyCreatedBy.to_string(), "createdBy field empty");
        assert_eq!(
            ValidationError::CountTooHigh.to_string(),
            "repeat count must be lower than or equal to 50"
        );
        assert_eq!(
            ValidationError::CountTooLow.to_string(),
            "repeat count must be higher than 0"
        );
    }

    #[test]
    fn http_status_display_includes_body_when_present() {
        let bare = BackendError::HttpStatus { code: 500, body: String::new() };
        assert_eq!(bare.to_string(), "Alertmanager returned an HTTP error code: 500");

        let with_body = BackendError::HttpStatus {
            code: 500,
            body: "silence abc already expired\n".into(),
        };
        assert!(with_body.to_string().ends_with("(silence abc already expired)"));
    }
}
