// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;

#[test]
fn test_error_not_logged_in_display() {
    let msg = Error::NotLoggedIn.to_string();
    assert!(msg.contains("not logged in"));
    assert!(msg.contains("towline login"));
}

#[test]
fn test_error_invalid_argument_display() {
    let err = Error::InvalidArgument {
        field: "photo",
        value: "front".to_string(),
        hint: "use KIND=URI",
    };
    let msg = err.to_string();
    assert!(msg.contains("invalid photo: 'front'"));
    assert!(msg.contains("hint: use KIND=URI"));
}

#[test]
fn test_error_from_core_keeps_message() {
    let err: Error = towline_core::Error::FieldRequired { field: "job id" }.into();
    assert_eq!(err.to_string(), "job id is required");
}

#[test]
fn test_error_from_queue_already_draining() {
    let err: Error = QueueError::AlreadyDraining("vin_scanner".into()).into();
    assert!(matches!(err, Error::AlreadyDraining(ref name) if name == "vin_scanner"));
}

#[test]
fn test_error_from_queue_io() {
    let err: Error = QueueError::Io(std::io::Error::other("disk full")).into();
    assert!(matches!(err, Error::Queue(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn test_error_from_submit() {
    let err: Error = SubmitError::Server {
        status: 422,
        body: Some(serde_json::json!({"error": "bad vin"})),
    }
    .into();
    let msg = err.to_string();
    assert!(msg.contains("422"));
    assert!(msg.contains("bad vin"));
}

#[test]
fn test_error_config_display() {
    let err = Error::Config("failed to parse config: x".into());
    assert!(err.to_string().starts_with("config error:"));
}
