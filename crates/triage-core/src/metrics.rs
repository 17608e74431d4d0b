// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure metrics primitives: platform timestamps, time deltas, means, rates
//! and the time windows used by store queries.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// Calendar date format accepted by report and statistics requests.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a platform timestamp (`"1600000000.000100"`) into epoch seconds.
pub fn parse_ts(ts: &str) -> Result<f64, TriageError> {
    let value: f64 = ts
        .trim()
        .parse()
        .map_err(|_| TriageError::Validation(format!("malformed timestamp: {ts:?}")))?;
    if !value.is_finite() {
        return Err(TriageError::Validation(format!(
            "malformed timestamp: {ts:?}"
        )));
    }
    Ok(value)
}

/// Signed delta `end - start` in minutes.
pub fn delta_minutes(start_ts: &str, end_ts: &str) -> Result<f64, TriageError> {
    Ok((parse_ts(end_ts)? - parse_ts(start_ts)?) / 60.0)
}

/// Arithmetic mean, zero for an empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Integer percentage of `fixed` out of `total`, capped at 100.
pub fn resolution_rate(fixed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((fixed * 100 / total).min(100)) as u32
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(date: &str) -> Result<NaiveDate, TriageError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| TriageError::Validation(format!("malformed date {date:?}: {e}")))
}

/// Epoch seconds at midnight UTC of a `YYYY-MM-DD` date.
pub fn date_to_epoch(date: &str) -> Result<i64, TriageError> {
    let day = parse_date(date)?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TriageError::Validation(format!("malformed date {date:?}")))?;
    Ok(Utc.from_utc_datetime(&midnight).timestamp())
}

/// Shifts a `YYYY-MM-DD` date by `days`.
pub fn shift_date(date: &str, days: i64) -> Result<String, TriageError> {
    let day = parse_date(date)? + Duration::days(days);
    Ok(day.format(DATE_FORMAT).to_string())
}

/// The current designee window: Monday of the week containing `now` to the
/// following day, as `YYYY-MM-DD` dates.
pub fn designee_window(now_epoch: i64) -> Result<(String, String), TriageError> {
    let now = Utc
        .timestamp_opt(now_epoch, 0)
        .single()
        .ok_or_else(|| TriageError::Validation(format!("invalid clock value {now_epoch}")))?
        .date_naive();
    let monday = now - Duration::days(i64::from(now.weekday().num_days_from_monday()));
    let tomorrow = now + Duration::days(1);
    Ok((
        monday.format(DATE_FORMAT).to_string(),
        tomorrow.format(DATE_FORMAT).to_string(),
    ))
}

/// A closed interval of epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    pub fn new(start: f64, end: f64) -> Result<Self, TriageError> {
        if end < start {
            return Err(TriageError::Validation(format!(
                "window end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `secs` seconds up to and including `now`.
    pub fn trailing(now: f64, secs: u64) -> Self {
        Self {
            start: now - secs as f64,
            end: now,
        }
    }

    /// Window spanning two `YYYY-MM-DD` dates, from midnight to midnight UTC.
    pub fn from_dates(start: &str, end: &str) -> Result<Self, TriageError> {
        Self::new(date_to_epoch(start)? as f64, date_to_epoch(end)? as f64)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }

    /// Whether a platform timestamp falls in the window. Malformed timestamps never match.
    pub fn contains_ts(&self, ts: &str) -> bool {
        parse_ts(ts).map(|v| self.contains(v)).unwrap_or(false)
    }
}
