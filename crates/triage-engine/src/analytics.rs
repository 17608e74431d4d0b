// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Period statistics over stored threads.

use triage_core::metrics::{mean, resolution_rate};
use triage_core::{Statistics, Thread, ThreadStatus};

/// Aggregates already-fetched threads and designee records for a period.
///
/// Response time is averaged over threads that received replies and have a
/// recorded response time; resolution time likewise over threads carrying
/// reactions.
pub fn summarize(threads: Vec<Thread>, designees: Vec<Thread>, start: &str, end: &str) -> Statistics {
    let response_times: Vec<f64> = threads
        .iter()
        .filter(|t| !t.replies.is_empty())
        .filter_map(|t| t.response_time)
        .collect();
    let resolution_times: Vec<f64> = threads
        .iter()
        .filter(|t| !t.reactions.is_empty())
        .filter_map(|t| t.resolution_time)
        .collect();
    let fixed = threads
        .iter()
        .filter(|t| t.status == ThreadStatus::Fixed)
        .count();

    Statistics {
        response_time: mean(&response_times),
        resolution_time: mean(&resolution_times),
        resolution_rate: resolution_rate(fixed, threads.len()),
        threads,
        designees,
        start: start.to_string(),
        end: end.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{Reaction, Reply, User};

    fn thread(ts: &str, status: ThreadStatus) -> Thread {
        let mut t = Thread::new(ts, User::new("U1", "alice"), "q");
        t.status = status;
        t
    }

    #[test]
    fn empty_period_is_all_zero() {
        let stats = summarize(Vec::new(), Vec::new(), "2026-10-12", "2026-10-19");
        assert_eq!(stats.response_time, 0.0);
        assert_eq!(stats.resolution_time, 0.0);
        assert_eq!(stats.resolution_rate, 0);
        assert_eq!(stats.start, "2026-10-12");
    }

    #[test]
    fn means_only_count_threads_with_activity() {
        let mut answered = thread("1.0", ThreadStatus::Responded);
        answered.replies.push(Reply::default());
        answered.response_time = Some(10.0);

        let mut answered_late = thread("2.0", ThreadStatus::Fixed);
        answered_late.replies.push(Reply::default());
        answered_late.response_time = Some(30.0);
        answered_late.reactions.push(Reaction::default());
        answered_late.resolution_time = Some(45.0);

        let silent = thread("3.0", ThreadStatus::Unresponded);

        let stats = summarize(vec![answered, answered_late, silent], Vec::new(), "a", "b");
        assert_eq!(stats.response_time, 20.0);
        assert_eq!(stats.resolution_time, 45.0);
        assert_eq!(stats.resolution_rate, 33);
        assert_eq!(stats.threads.len(), 3);
    }
}
