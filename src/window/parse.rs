//! Duration and timestamp parsers

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static DURATION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)([smhdw])").unwrap());

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Parse a relative duration such as `2h30m` into milliseconds.
///
/// Every character must belong to a `<integer><unit>` token. An empty string
/// is a zero duration.
pub fn parse_duration(input: &str) -> Result<i64> {
    let mut total: i64 = 0;
    let mut covered = 0;

    for caps in DURATION_TOKEN.captures_iter(input) {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let digits = caps.get(1).map_or("", |m| m.as_str());
        let unit = caps.get(2).map_or("", |m| m.as_str());

        let value: i64 = digits
            .parse()
            .map_err(|e| Error::parse(input, format!("invalid number '{digits}': {e}")))?;

        let unit_ms = match unit {
            "s" => SECOND_MS,
            "m" => MINUTE_MS,
            "h" => HOUR_MS,
            "d" => DAY_MS,
            "w" => WEEK_MS,
            other => return Err(Error::parse(input, format!("unknown unit '{other}'"))),
        };

        total = value
            .checked_mul(unit_ms)
            .and_then(|ms| total.checked_add(ms))
            .ok_or_else(|| Error::parse(input, "duration overflows"))?;
        covered += whole.len();
    }

    if covered != input.len() {
        return Err(Error::parse(
            input,
            "could not parse full duration expression",
        ));
    }

    Ok(total)
}

/// Parse an ISO 8601 date or datetime. Values without an offset are UTC.
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }

    DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%z")
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::parse(input, format!("not a date or datetime: {e}")))
}

/// Resolve an absolute or relative time expression to epoch milliseconds.
///
/// Absolute values before the epoch are not accepted; relative values are
/// subtracted from `now`.
pub fn resolve_instant(input: &str, now: DateTime<Utc>) -> Result<i64> {
    if let Ok(dt) = parse_datetime(input) {
        let millis = dt.timestamp_millis();
        if millis >= 0 {
            return Ok(millis);
        }
    }

    match parse_duration(input) {
        Ok(offset) => Ok(now.timestamp_millis() - offset),
        Err(_) => Err(Error::parse(
            input,
            "expected a date, datetime or relative duration",
        )),
    }
}

/// Optional start and end of a query, in epoch milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive start
    pub start: Option<i64>,
    /// Inclusive end
    pub end: Option<i64>,
}

impl TimeWindow {
    /// Unbounded window
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Resolve `since`/`until` expressions against `now`. Missing or empty
    /// expressions leave that side unbounded.
    pub fn resolve(since: Option<&str>, until: Option<&str>, now: DateTime<Utc>) -> Result<Self> {
        let bound = |expr: Option<&str>| -> Result<Option<i64>> {
            match expr.map(str::trim) {
                None | Some("") => Ok(None),
                Some(expr) => resolve_instant(expr, now).map(Some),
            }
        };

        let window = Self {
            start: bound(since)?,
            end: bound(until)?,
        };

        if let (Some(start), Some(end)) = (window.start, window.end) {
            if start > end {
                return Err(Error::invalid_value(
                    "since",
                    format!("window start {start} is after end {end}"),
                ));
            }
        }

        Ok(window)
    }

    /// Whether a timestamp falls inside the window
    pub fn contains(&self, timestamp_millis: i64) -> bool {
        self.start.map_or(true, |start| timestamp_millis >= start)
            && self.end.map_or(true, |end| timestamp_millis <= end)
    }
}
