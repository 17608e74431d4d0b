// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands: `process`, `remind` and `report`.
//!
//! Input events are JSON lines; every directive produced is written to
//! stdout as one JSON line. A line that fails to parse or to process is
//! logged and skipped, so one bad delivery never stalls the stream.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use triage_config::model::TriageConfig;
use triage_core::{ActionDirective, TriageError};
use triage_engine::{Event, LifecycleEngine, RawEvent};

use crate::app::App;

/// Counters reported at the end of a stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub handled: usize,
    pub failed: usize,
    pub directives: usize,
}

pub async fn run_process(config: &TriageConfig, raw: bool) -> Result<(), TriageError> {
    let app = App::build(config).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let stats = process_stream(&app.engine, stdin, &mut stdout, raw).await?;
    info!(
        handled = stats.handled,
        failed = stats.failed,
        directives = stats.directives,
        "input stream finished"
    );
    app.shutdown().await
}

pub async fn run_remind(config: &TriageConfig) -> Result<(), TriageError> {
    let app = App::build(config).await?;
    let directives = app.engine.handle(Event::ReminderSweep).await?;
    write_directives(&mut tokio::io::stdout(), &directives).await?;
    app.shutdown().await
}

pub async fn run_report(
    config: &TriageConfig,
    start: String,
    end: String,
) -> Result<(), TriageError> {
    let app = App::build(config).await?;
    let directives = app.engine.handle(Event::Report { start, end }).await?;
    write_directives(&mut tokio::io::stdout(), &directives).await?;
    app.shutdown().await
}

/// Decode one input line into an engine call.
pub async fn handle_line(
    engine: &LifecycleEngine,
    line: &str,
    raw: bool,
) -> Result<Vec<ActionDirective>, TriageError> {
    if raw {
        let event: RawEvent = serde_json::from_str(line)
            .map_err(|e| TriageError::Validation(format!("malformed platform event: {e}")))?;
        engine.handle_raw(event).await
    } else {
        let event: Event = serde_json::from_str(line)
            .map_err(|e| TriageError::Validation(format!("malformed event: {e}")))?;
        engine.handle(event).await
    }
}

/// Drain `input` line by line until EOF.
pub async fn process_stream<R, W>(
    engine: &LifecycleEngine,
    input: R,
    output: &mut W,
    raw: bool,
) -> Result<StreamStats, TriageError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = StreamStats::default();
    let mut lines = input.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| TriageError::Internal(format!("reading input: {e}")))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match handle_line(engine, line, raw).await {
            Ok(directives) => {
                stats.handled += 1;
                stats.directives += write_directives(output, &directives).await?;
            }
            Err(e) => {
                stats.failed += 1;
                warn!(error = %e, "event rejected");
            }
        }
    }

    Ok(stats)
}

/// Write every non-empty directive as a JSON line. Returns how many were written.
pub async fn write_directives<W>(
    output: &mut W,
    directives: &[ActionDirective],
) -> Result<usize, TriageError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    for directive in directives.iter().filter(|d| !d.is_no_op()) {
        let mut line = serde_json::to_string(directive)
            .map_err(|e| TriageError::Internal(format!("encoding directive: {e}")))?;
        line.push('\n');
        output
            .write_all(line.as_bytes())
            .await
            .map_err(|e| TriageError::Internal(format!("writing output: {e}")))?;
        written += 1;
    }
    output
        .flush()
        .await
        .map_err(|e| TriageError::Internal(format!("flushing output: {e}")))?;
    Ok(written)
}
