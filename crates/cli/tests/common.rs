// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens here, so the device always looks offline.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:1";

pub const VIN: &str = "1HGCM82633A004352";

/// `towline` with a clean environment.
pub fn towline() -> Command {
    let mut cmd = cargo_bin_cmd!("towline");
    cmd.env_remove("TOWLINE_TOKEN")
        .env_remove("TOWLINE_API_URL")
        .env_remove("TOWLINE_STATE_DIR")
        .env_remove("COLOR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// `towline` against a fresh state directory and an unreachable API.
pub fn offline(state: &TempDir) -> Command {
    let mut cmd = towline();
    cmd.env("TOWLINE_STATE_DIR", state.path())
        .env("TOWLINE_API_URL", UNREACHABLE_API);
    cmd
}

/// Like [`offline`], with a session token in the environment.
pub fn offline_logged_in(state: &TempDir) -> Command {
    let mut cmd = offline(state);
    cmd.env("TOWLINE_TOKEN", "device-token");
    cmd
}
