// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::info;
use triage_core::metrics::shift_date;
use triage_core::{ActionDirective, Statistics, TriageError, Window};

use crate::analytics::summarize;
use crate::engine::LifecycleEngine;
use crate::report::{build_report, REPORT_TEXT};

impl LifecycleEngine {
    /// Statistics for a `YYYY-MM-DD` period.
    ///
    /// Dates are validated before the store is touched, and read failures are
    /// returned rather than degraded.
    pub async fn analyse(&self, start: &str, end: &str) -> Result<Statistics, TriageError> {
        let window = Window::from_dates(start, end)?;
        let threads = self.store.find_threads_by_window(window).await?;
        let designees = self.store.find_designees(window).await?;
        Ok(summarize(threads, designees, start, end))
    }

    /// Compares the period with the one a week earlier and posts the report.
    pub(crate) async fn report(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        Window::from_dates(start, end)?;
        let previous_start = shift_date(start, -7)?;
        let previous_end = shift_date(end, -7)?;

        let current = self.analyse(start, end).await?;
        let previous = self.analyse(&previous_start, &previous_end).await?;
        let report = build_report(&current, &previous, &self.settings.dashboard_url);
        info!(
            start,
            end,
            messages = current.threads.len(),
            message_delta = report.message_delta,
            resolution_delta = report.resolution_delta,
            "report built"
        );
        Ok(vec![ActionDirective::PostToChannel {
            text: REPORT_TEXT.to_string(),
            blocks: report.blocks,
        }])
    }
}
