//! Decoding of the dashboard's silence form.
//!
//! Field names follow the dotted convention the form posts:
//! `Comment`, `CreatedBy`, `Matchers.<n>.Name`, `Matchers.<n>.Value`,
//! `Matchers.<n>.IsRegex`, `Schedule.StartTime`, `Schedule.EndTime`,
//! `Schedule.Repeat.Interval`, `Schedule.Repeat.Count`, `Schedule.Repeat.Enabled`.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::error_handling::types::WebError;
use crate::silence::types::{Matcher, SilenceRequest};

fn parse_bool(key: &str, value: &str) -> Result<bool, WebError> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" | "on" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" | "off" | "" => Ok(false),
        other => Err(WebError::FormDecode(format!(
            "field '{}': invalid boolean '{}'",
            key, other
        ))),
    }
}

fn parse_count(key: &str, value: &str) -> Result<i64, WebError> {
    if value.trim().is_empty() {
        return Ok(0);
    }
    value
        .trim()
        .parse()
        .map_err(|e| WebError::FormDecode(format!("field '{}': {}", key, e)))
}

fn set_matcher_field(
    matchers: &mut BTreeMap<usize, Matcher>,
    key: &str,
    rest: &str,
    value: &str,
) -> Result<(), WebError> {
    let (index, field) = rest
        .split_once('.')
        .ok_or_else(|| WebError::FormDecode(format!("field '{}': missing matcher field", key)))?;
    let index: usize = index
        .parse()
        .map_err(|e| WebError::FormDecode(format!("field '{}': {}", key, e)))?;

    let matcher = matchers.entry(index).or_default();
    match field {
        "Name" => matcher.name = value.to_string(),
        "Value" => matcher.value = value.to_string(),
        "IsRegex" => matcher.is_regex = parse_bool(key, value)?,
        _ => debug!("Ignoring unknown matcher field {}", key),
    }
    Ok(())
}

/// Builds a request from decoded form fields. Matchers are ordered by index.
pub fn silence_request_from_form(
    fields: &HashMap<String, String>,
) -> Result<SilenceRequest, WebError> {
    let mut request = SilenceRequest::default();
    let mut matchers = BTreeMap::new();

    for (key, value) in fields {
        match key.as_str() {
            "ID" => request.id = value.clone(),
            "Comment" => request.comment = value.clone(),
            "CreatedBy" => request.created_by = value.clone(),
            "Schedule.StartTime" => request.schedule.start_time = value.clone(),
            "Schedule.EndTime" => request.schedule.end_time = value.clone(),
            "Schedule.Repeat.Interval" => request.schedule.repeat.interval = value.clone(),
            "Schedule.Repeat.Count" => request.schedule.repeat.count = parse_count(key, value)?,
            "Schedule.Repeat.Enabled" => {
                request.schedule.repeat.enabled = parse_bool(key, value)?
            }
            other => match other.strip_prefix("Matchers.") {
                Some(rest) => set_matcher_field(&mut matchers, key, rest, value)?,
                None => debug!("Ignoring unknown form field {}", key),
            },
        }
    }

    request.matchers = matchers.into_values().collect();
    Ok(request)
}
