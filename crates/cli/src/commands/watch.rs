// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running watcher: drains every queue whenever the API becomes
//! reachable, retrying with backoff while it stays reachable.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use crate::colors;
use crate::error::Result;
use crate::fleet::Fleet;
use crate::sync::{DrainerHandle, SyncEvent, Transport};

/// One line describing `event` for the terminal.
pub fn describe(event: &SyncEvent) -> String {
    match event {
        SyncEvent::Queued {
            queue,
            pending,
            reason,
        } => format!("{queue}: queued ({reason}); {pending} pending"),
        SyncEvent::DrainStarted { queue, pending } => {
            format!("{queue}: draining {pending}")
        }
        SyncEvent::DrainCompleted {
            queue,
            submitted,
            dead_lettered,
        } => {
            let mut line = format!("{queue}: {} {submitted}", colors::good("sent"));
            if *dead_lettered > 0 {
                line.push_str(&format!(", {dead_lettered} dead-lettered"));
            }
            line
        }
        SyncEvent::DrainHalted {
            queue,
            submitted,
            remaining,
            error,
        } => format!(
            "{queue}: sent {submitted}, {} ({error}); {remaining} pending",
            colors::warn("stopped")
        ),
        SyncEvent::RetryScheduled { queue, delay } => {
            format!("{queue}: retrying in {}ms", delay.as_millis())
        }
        SyncEvent::DeadLettered { queue, reason } => {
            format!("{queue}: {} ({reason})", colors::bad("dead-lettered"))
        }
    }
}

/// Watch until `shutdown` resolves, then stop once in-flight drain passes
/// finish.
pub async fn run<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
    out: &mut impl Write,
) -> Result<()> {
    let mut events = fleet.events().subscribe();
    let (conn_tx, mut conn_rx) = mpsc::unbounded_channel();
    let _connectivity = fleet.monitor().subscribe(move |connected| {
        let _ = conn_tx.send(connected);
    });

    let handles: Vec<DrainerHandle> = fleet.flows().iter().map(|flow| flow.attach()).collect();
    let poller = fleet.monitor().watch(interval);
    tracing::info!(
        queues = handles.len(),
        interval_ms = interval.as_millis() as u64,
        "watching connectivity"
    );
    writeln!(out, "watching {}; Ctrl-C to stop", fleet.client().transport().base_url())?;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            // Report everything already observed before honoring shutdown.
            biased;
            Some(connected) = conn_rx.recv() => {
                let state = if connected {
                    colors::good("online")
                } else {
                    colors::bad("offline")
                };
                writeln!(out, "{state}")?;
            }
            event = events.recv() => match event {
                Ok(event) => writeln!(out, "{}", describe(&event))?,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "sync events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown => break,
        }
    }

    poller.abort();
    for handle in handles {
        handle.shutdown().await;
    }
    tracing::info!("watcher stopped");
    writeln!(out, "stopped")?;
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
