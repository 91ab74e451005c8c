// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Split test files for CLI parsing, one category per file.

#![allow(clippy::panic)]

use super::*;


/// The fleet command `cli` parsed to.
fn fleet(cli: Cli) -> FleetCommand {
    match cli.command {
        Command::Fleet(command) => command,
        _ => panic!("expected a fleet command"),
    }
}
