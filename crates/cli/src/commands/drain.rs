// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot drain of every screen queue.

use std::io::Write;

use crate::colors;
use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::sync::{DrainOutcome, Transport};

/// Drain each queue once if the API is reachable.
///
/// Queues drain independently: a halt in one does not stop the others. The
/// first halt is returned as the error after every queue has been tried.
pub async fn run<Tr: Transport + 'static>(fleet: &Fleet<Tr>, out: &mut impl Write) -> Result<()> {
    if !fleet.monitor().poll_once().await {
        let mut pending = 0;
        for flow in fleet.flows() {
            pending += flow.pending()?;
        }
        writeln!(out, "{}; {pending} pending", colors::bad("offline"))?;
        return Err(Error::Offline);
    }

    let mut first_halt = None;
    let mut drained_any = false;
    for flow in fleet.flows() {
        let name = flow.name().to_string();
        match flow.drain_now().await? {
            DrainOutcome::Idle => continue,
            DrainOutcome::AlreadyDraining => {
                writeln!(out, "{name}: {}", colors::warn("already draining"))?;
            }
            DrainOutcome::Completed {
                submitted,
                dead_lettered,
            } => {
                write!(out, "{name}: {} {submitted}", colors::good("sent"))?;
                if dead_lettered > 0 {
                    write!(out, ", {dead_lettered} dead-lettered")?;
                }
                writeln!(out)?;
            }
            DrainOutcome::Halted {
                submitted,
                dead_lettered,
                remaining,
                error,
            } => {
                write!(out, "{name}: {} {submitted}", colors::good("sent"))?;
                if dead_lettered > 0 {
                    write!(out, ", {dead_lettered} dead-lettered")?;
                }
                writeln!(
                    out,
                    ", {} ({error}); {remaining} pending",
                    colors::warn("stopped")
                )?;
                if first_halt.is_none() {
                    first_halt = Some(error);
                }
            }
        }
        drained_any = true;
    }

    if !drained_any {
        writeln!(out, "nothing to send")?;
    }
    match first_halt {
        Some(error) => Err(Error::Submit(error)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
