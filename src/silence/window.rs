//! Window expansion: turns one schedule and its repeat specification into the
//! ordered list of absolute periods to silence.
//!
//! Timestamps are handled as fixed-point UTC instants; shifting never applies
//! calendar rules, so `add_duration` is exact and reversible.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};

use super::types::{Schedule, SilenceWindow, REQUEST_TIME_LAYOUT};
use crate::error_handling::types::TimeParseError;

/// Hours covered by one step of the given interval code. Unknown or empty
/// codes do not shift at all.
pub fn interval_hours(interval: &str) -> i64 {
    match interval {
        "h" => 1,
        "d" => 24,
        "w" => 168,
        _ => 0,
    }
}

/// Byte template of the request layout; `d` stands for any ASCII digit.
const LAYOUT_TEMPLATE: &[u8; 24] = b"dddd-dd-ddTdd:dd:dd.dddZ";

fn matches_layout(input: &str) -> bool {
    input.len() == LAYOUT_TEMPLATE.len()
        && input
            .bytes()
            .zip(LAYOUT_TEMPLATE.iter())
            .all(|(b, t)| match t {
                b'd' => b.is_ascii_digit(),
                _ => b == *t,
            })
}

/// Parses a timestamp in the fixed request layout (`YYYY-MM-DDTHH:mm:ss.sssZ`).
///
/// Every field is zero-padded to its full width, the year has four digits
/// and no sign, and the offset is always `Z`.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if !matches_layout(input) {
        return Err(TimeParseError::Malformed {
            input: input.to_string(),
            reason: "expected YYYY-MM-DDTHH:mm:ss.sssZ".to_string(),
        });
    }

    NaiveDateTime::parse_from_str(input, REQUEST_TIME_LAYOUT)
        .map(|naive| naive.and_utc())
        .map_err(|e| TimeParseError::Malformed {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(REQUEST_TIME_LAYOUT).to_string()
}

/// Shifts an instant by `count` steps of `interval`. The result must still
/// be representable in the request layout (years 0000 to 9999).
pub fn shift(
    instant: DateTime<Utc>,
    interval: &str,
    count: i64,
) -> Result<DateTime<Utc>, TimeParseError> {
    let out_of_range = || TimeParseError::OutOfRange {
        input: format_timestamp(&instant),
    };
    let hours = interval_hours(interval)
        .checked_mul(count)
        .ok_or_else(out_of_range)?;
    let offset = Duration::try_hours(hours).ok_or_else(out_of_range)?;
    instant
        .checked_add_signed(offset)
        .filter(|shifted| (0..=9999).contains(&shifted.year()))
        .ok_or_else(out_of_range)
}

/// Adds `count` steps of `interval` to a timestamp in the request layout and
/// renders the result in the same layout.
pub fn add_duration(timestamp: &str, interval: &str, count: i64) -> Result<String, TimeParseError> {
    let parsed = parse_timestamp(timestamp)?;
    let next = shift(parsed, interval, count)?;
    Ok(format_timestamp(&next))
}

/// Lazy sequence of windows for one schedule.
///
/// Each item is computed on demand; a timestamp that cannot be parsed or
/// shifted only fails its own item. Calling [`expand`] again yields the same
/// sequence from the start.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    schedule: &'a Schedule,
    next: usize,
    count: usize,
}

impl<'a> Windows<'a> {
    fn window_at(&self, index: usize) -> Result<SilenceWindow, TimeParseError> {
        let interval = self.schedule.repeat.interval.as_str();
        let steps = i64::try_from(index).map_err(|_| TimeParseError::OutOfRange {
            input: self.schedule.start_time.clone(),
        })?;

        let start = shift(parse_timestamp(&self.schedule.start_time)?, interval, steps)?;
        let end = shift(parse_timestamp(&self.schedule.end_time)?, interval, steps)?;
        Ok(SilenceWindow { index, start, end })
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = Result<SilenceWindow, TimeParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.window_at(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Windows<'a> {}

/// Expands a schedule into `repeat.count` windows, window `i` being the
/// original period shifted by `i` intervals. Overlapping windows are not
/// rejected.
pub fn expand(schedule: &Schedule) -> Windows<'_> {
    Windows {
        schedule,
        next: 0,
        count: schedule.repeat.window_count(),
    }
}
