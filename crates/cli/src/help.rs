// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// clap styles matching the [`colors`] palette.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let fg = |code| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    let header = fg(colors::codes::HEADER);
    let context = fg(colors::codes::CONTEXT);

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(fg(colors::codes::LITERAL))
        .placeholder(context)
        .valid(context)
        .error(fg(colors::codes::BAD))
}

/// Main help template with the command list ahead of the options.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands grouped by screen, shown before options in main help.
pub fn commands() -> String {
    let rows: [(&str, &[(&str, &str)]); 3] = [
        (
            "Record:",
            &[
                ("scan", "Record a VIN scan"),
                ("track", "Record a location update"),
                ("complete", "Complete a job with its tracking path"),
                ("inspect", "Submit a vehicle inspection"),
                ("assign", "Create and assign a job"),
            ],
        ),
        (
            "Sync:",
            &[
                ("status", "Show queued and dead-lettered operations"),
                ("drain", "Send queued operations now"),
                ("watch", "Drain whenever the API becomes reachable"),
            ],
        ),
        (
            "Session & Fleet:",
            &[
                ("login", "Store the device token"),
                ("logout", "Remove the device token"),
                ("verify", "Check the session against the API"),
                ("drivers", "List drivers"),
                ("vehicles", "List vehicles"),
                ("completion", "Generate shell completions"),
            ],
        ),
    ];

    let width = rows
        .iter()
        .flat_map(|(_, cmds)| cmds.iter().map(|(name, _)| name.len()))
        .max()
        .unwrap_or(0);
    let mut out = Vec::new();
    for (title, cmds) in rows {
        if !out.is_empty() {
            out.push(String::new());
        }
        out.push(colors::header(title));
        for (name, about) in cmds {
            let pad = " ".repeat(width - name.len() + 2);
            out.push(format!("  {}{pad}{about}", colors::literal(name)));
        }
    }
    out.join("\n")
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  towline login --token <TOKEN>     Store the device token
  towline scan 1HGCM82633A004352    Record a VIN scan
  towline status                    See what is waiting to be sent
  towline watch                     Send queued work when back online",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
