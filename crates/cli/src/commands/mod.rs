// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod drain;
pub mod lists;
pub mod record;
pub mod status;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::io::Write;

use crate::colors;
use crate::error::{Error, Result};
use crate::screens::Outcome;

/// Print the outcome of recording `what`.
///
/// Local rejections and dead-lettered operations are returned as errors so
/// the process exits non-zero.
pub fn report(what: &str, outcome: Outcome, out: &mut impl Write) -> Result<()> {
    match outcome {
        Outcome::Submitted { .. } => {
            writeln!(out, "{} {what}", colors::good("submitted"))?;
            Ok(())
        }
        Outcome::Queued { reason, pending } => {
            writeln!(
                out,
                "{} {what} ({reason}); {pending} pending",
                colors::warn("queued")
            )?;
            Ok(())
        }
        Outcome::Rejected(e) => Err(Error::Core(e)),
        Outcome::DeadLettered { error } => {
            writeln!(
                out,
                "{} {what}: moved to dead letters",
                colors::bad("rejected")
            )?;
            Err(Error::Submit(error))
        }
    }
}
