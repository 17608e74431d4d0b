// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-running mode: stdin events plus a periodic reminder sweep.
//!
//! Runs until stdin closes or SIGTERM/SIGINT arrives.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use triage_config::model::TriageConfig;
use triage_core::TriageError;
use triage_engine::{Event, LifecycleEngine};

use crate::app::App;
use crate::process::{handle_line, write_directives, StreamStats};

pub async fn run_serve(config: &TriageConfig, raw: bool) -> Result<(), TriageError> {
    let app = App::build(config).await?;
    let cancel = install_signal_handler();
    let sweep_every = Duration::from_secs(config.engine.reminder_window_secs.max(1));

    info!(sweep_secs = sweep_every.as_secs(), raw, "serving");
    let stats = serve_loop(
        &app.engine,
        BufReader::new(tokio::io::stdin()),
        &mut tokio::io::stdout(),
        raw,
        sweep_every,
        cancel,
    )
    .await?;
    info!(
        handled = stats.handled,
        failed = stats.failed,
        directives = stats.directives,
        "shutdown complete"
    );
    app.shutdown().await
}

/// Multiplex input lines and sweep ticks until EOF or cancellation.
pub async fn serve_loop<R, W>(
    engine: &LifecycleEngine,
    input: R,
    output: &mut W,
    raw: bool,
    sweep_every: Duration,
    cancel: CancellationToken,
) -> Result<StreamStats, TriageError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = StreamStats::default();
    let mut lines = input.lines();
    let mut ticker = tokio::time::interval(sweep_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it so startup does not sweep.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("cancellation requested, stopping");
                break;
            }
            _ = ticker.tick() => {
                match engine.handle(Event::ReminderSweep).await {
                    Ok(directives) => {
                        stats.directives += write_directives(output, &directives).await?;
                    }
                    Err(e) => warn!(error = %e, "reminder sweep failed"),
                }
            }
            line = lines.next_line() => {
                let line = line.map_err(|e| TriageError::Internal(format!("reading input: {e}")))?;
                let Some(line) = line else {
                    debug!("input closed");
                    break;
                };
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
        }
    }

    Ok(stats)
}

/// Returns a token cancelled on SIGTERM or SIGINT (Ctrl+C).
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                        _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
    });

    token
}
