//! Request validation. Pure predicates over the request and its parts,
//! composed in a fixed order that stops at the first failure.

use regex::Regex;

use super::types::{Matcher, Repeat, Schedule, SilenceRequest, REPEAT_COUNT_MAX, REPEAT_COUNT_MIN};
use super::window::parse_timestamp;
use crate::error_handling::types::ValidationError;

fn is_known_interval(interval: &str) -> bool {
    matches!(interval, "" | "h" | "d" | "w")
}

/// A matcher needs a label name and a value; regex values must compile.
pub fn validate_matcher(matcher: &Matcher) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidMatcher(format!("{}={}", matcher.name, matcher.value));

    if matcher.name.trim().is_empty() || matcher.value.is_empty() {
        return Err(invalid());
    }
    if matcher.is_regex && Regex::new(&matcher.value).is_err() {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_schedule(schedule: &Schedule) -> Result<(), ValidationError> {
    if schedule.is_empty() {
        return Err(ValidationError::EmptySchedule);
    }
    parse_timestamp(&schedule.start_time).map_err(|_| ValidationError::InvalidStartTime)?;
    parse_timestamp(&schedule.end_time).map_err(|_| ValidationError::InvalidEndTime)?;
    Ok(())
}

pub fn validate_repeat(repeat: &Repeat) -> Result<(), ValidationError> {
    if repeat.is_empty() {
        return Err(ValidationError::EmptyRepeat);
    }
    if repeat.count <= REPEAT_COUNT_MIN {
        return Err(ValidationError::CountTooLow);
    }
    if repeat.count > REPEAT_COUNT_MAX {
        return Err(ValidationError::CountTooHigh);
    }
    if !is_known_interval(&repeat.interval) {
        return Err(ValidationError::UnknownInterval);
    }
    Ok(())
}

/// Accepts or rejects a silence request. The error's `Display` is the reason.
pub fn validate(request: &SilenceRequest) -> Result<(), ValidationError> {
    if request.comment.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    if request.created_by.is_empty() {
        return Err(ValidationError::EmptyCreatedBy);
    }
    if request.matchers.is_empty() {
        return Err(ValidationError::NoMatchers);
    }
    for matcher in &request.matchers {
        validate_matcher(matcher)?;
    }
    validate_schedule(&request.schedule)?;
    validate_repeat(&request.schedule.repeat)
}
