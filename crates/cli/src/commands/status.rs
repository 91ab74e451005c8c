// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue status for every screen.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::colors;
use crate::error::Result;
use crate::fleet::Fleet;
use crate::sync::Transport;

#[derive(Debug, Serialize)]
pub(crate) struct QueueStatus {
    pub name: String,
    pub pending: usize,
    pub dead_letters: usize,
    pub durable: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub api: String,
    pub logged_in: bool,
    pub queues: Vec<QueueStatus>,
}

impl StatusReport {
    fn total_pending(&self) -> usize {
        self.queues.iter().map(|q| q.pending).sum()
    }
}

pub(crate) fn collect<Tr: Transport + 'static>(fleet: &Fleet<Tr>) -> Result<StatusReport> {
    let mut queues = Vec::new();
    for flow in fleet.flows() {
        let queue = flow.queue();
        queues.push(QueueStatus {
            name: queue.name().to_string(),
            pending: queue.len()?,
            dead_letters: queue.dead_letters()?.len(),
            durable: queue.is_durable(),
        });
    }
    Ok(StatusReport {
        api: fleet.client().transport().base_url().to_string(),
        logged_in: fleet.client().has_credential(),
        queues,
    })
}

pub fn run<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let report = collect(fleet)?;
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Text => output_text(&report, out)?,
    }
    Ok(())
}

fn output_text(report: &StatusReport, out: &mut impl Write) -> Result<()> {
    writeln!(out, "API: {}", report.api)?;
    let session = if report.logged_in {
        colors::good("logged in")
    } else {
        colors::bad("not logged in")
    };
    writeln!(out, "Session: {session}")?;
    writeln!(out, "Pending: {}", report.total_pending())?;

    let width = report.queues.iter().map(|q| q.name.len()).max().unwrap_or(0);
    for queue in &report.queues {
        let mut line = format!("  {:width$}  {} pending", queue.name, queue.pending);
        if queue.dead_letters > 0 {
            line.push_str(&format!(", {} dead-lettered", queue.dead_letters));
        }
        if !queue.durable {
            line.push_str(&format!(" {}", colors::context("(memory)")));
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
