// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only fleet lists used to populate the assignment screen.

use std::io::Write;

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::fleet::Fleet;
use crate::sync::Transport;

pub async fn drivers<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let items = fleet.job_assignment.drivers().await?;
    output(&items, &["name", "email"], format, out)
}

pub async fn vehicles<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let items = fleet.job_assignment.vehicles().await?;
    output(&items, &["plate", "vin", "name"], format, out)
}

fn output(
    items: &[Value],
    label_fields: &[&str],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(items)?)?,
        OutputFormat::Text => {
            for item in items {
                writeln!(out, "{}", text_line(item, label_fields))?;
            }
        }
    }
    Ok(())
}

/// `id  label`, where the label is the first of `label_fields` present.
fn text_line(item: &Value, label_fields: &[&str]) -> String {
    let id = item.get("id").map(display).unwrap_or_else(|| "-".into());
    match label_fields.iter().find_map(|f| item.get(*f)) {
        Some(label) => format!("{id}  {}", display(label)),
        None => id,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "lists_tests.rs"]
mod tests;
