// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time source used by every handler that reads "now".

use std::sync::Mutex;

use chrono::Utc;

/// Supplies the current time as fractional epoch seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;

    /// Whole epoch seconds, truncated.
    fn now_secs(&self) -> i64 {
        self.now() as i64
    }
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        let now = Utc::now();
        now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: f64) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, secs: f64) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += secs;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.lock().map(|guard| *guard).unwrap_or_default()
    }
}

/// Formats epoch seconds as a platform timestamp with microsecond precision.
pub fn format_ts(epoch: f64) -> String {
    format!("{epoch:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(100.5);
        assert_eq!(clock.now(), 100.5);
        assert_eq!(clock.now_secs(), 100);
        clock.advance(60.0);
        assert_eq!(clock.now(), 160.5);
        clock.set(10.0);
        assert_eq!(clock.now_secs(), 10);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now() > 1_577_836_800.0);
    }

    #[test]
    fn format_ts_keeps_six_decimals() {
        assert_eq!(format_ts(123456789.0), "123456789.000000");
    }
}
