// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly performance report rendering.
//!
//! [`build_report`] is pure: it compares two [`Statistics`] snapshots and lays
//! out a fixed block structure for the channel.

use serde_json::{json, Value};
use triage_core::Statistics;

use crate::directive::mention;

/// Plain-text fallback shown by clients that cannot render blocks.
pub const REPORT_TEXT: &str = "Report";

const HEADLINE: &str =
    "Here are the statistics of our performance on the support for the past week";

/// A rendered report plus the deltas it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub blocks: Vec<Value>,
    /// Message count of the current period minus the previous one.
    pub message_delta: i64,
    /// Resolution rate of the current period minus the previous one, in points.
    pub resolution_delta: i64,
}

/// Renders the report for `current` compared with `previous`.
pub fn build_report(current: &Statistics, previous: &Statistics, dashboard_url: &str) -> Report {
    let message_delta = current.threads.len() as i64 - previous.threads.len() as i64;
    let resolution_delta = i64::from(current.resolution_rate) - i64::from(previous.resolution_rate);
    let evolution = if message_delta < 0 { "less" } else { "more" };

    let fields = vec![
        mrkdwn(format!(
            "*Messages:*\n{} messages this week",
            current.threads.len()
        )),
        mrkdwn(format!(
            "*Resolution rate*\n{}% fixed",
            current.resolution_rate
        )),
        mrkdwn(format!(
            "*Average response time*\n{} min",
            current.response_time.round() as i64
        )),
        mrkdwn(format!(
            "*Messages evolution*\n{} messages {evolution} compared to last week",
            message_delta.abs()
        )),
        mrkdwn(format!(
            "*Resolution rate compared to last week*\n{resolution_delta:+} %"
        )),
        mrkdwn(format!("*Firemen*\n{}", designee_mentions(current).join(" "))),
    ];

    let blocks = vec![
        json!({
            "type": "section",
            "text": { "type": "plain_text", "text": HEADLINE },
        }),
        json!({ "type": "section", "fields": fields }),
        json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("For more statistics see our *<{dashboard_url}|analytics dashboard>*"),
            },
        }),
    ];

    Report {
        blocks,
        message_delta,
        resolution_delta,
    }
}

fn mrkdwn(text: String) -> Value {
    json!({ "type": "mrkdwn", "text": text })
}

/// One mention per distinct designee, in assignment order.
fn designee_mentions(stats: &Statistics) -> Vec<String> {
    let mut seen: Vec<&str> = Vec::new();
    for record in &stats.designees {
        let id = record.author.id.as_str();
        if !id.is_empty() && !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen.into_iter().map(mention).collect()
}
