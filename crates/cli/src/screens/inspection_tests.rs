// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::screens::testing::Harness;
use crate::screens::QueueReason;
use chrono::{TimeZone, Utc};
use towline_core::{PhotoKind, PhotoRef};
use yare::parameterized;

fn form(job_id: &str, inspection_type: &str) -> InspectionSubmit {
    InspectionSubmit {
        job_id: job_id.into(),
        inspection_type: inspection_type.into(),
        passed: true,
        details: "scuff on rear bumper".into(),
        tire_pressure: "32 psi".into(),
        brakes: "ok".into(),
        lights: "ok".into(),
        date: Utc.with_ymd_and_hms(2026, 4, 2, 9, 30, 0).unwrap(),
        photos: vec![PhotoRef::new(
            "file:///p/damage.jpg",
            PhotoKind::Damage,
            Utc.with_ymd_and_hms(2026, 4, 2, 9, 29, 0).unwrap(),
        )],
    }
}

#[parameterized(
    missing_job = { "", "pre_trip", "job id" },
    blank_job = { "   ", "pre_trip", "job id" },
    missing_type = { "job-1", "", "inspection type" },
)]
fn incomplete_form_is_rejected(job_id: &str, inspection_type: &str, expected: &str) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let harness = Harness::new(true);
        let screen = Inspection::new(&harness.ctx).unwrap();

        let outcome = screen.submit(form(job_id, inspection_type)).await.unwrap();

        match outcome {
            Outcome::Rejected(towline_core::Error::FieldRequired { field }) => {
                assert_eq!(field, expected)
            }
            other => unreachable!("expected rejection, got {other:?}"),
        }
        assert_eq!(screen.flow().pending().unwrap(), 0);
        assert_eq!(harness.transport.request_count(), 0);
    });
}

#[tokio::test]
async fn form_is_posted_with_camel_case_fields() {
    let harness = Harness::new(true);
    let screen = Inspection::new(&harness.ctx).unwrap();

    let outcome = screen.submit(form(" job-1 ", "pre_trip")).await.unwrap();

    assert!(outcome.is_submitted());
    let request = &harness.transport.requests()[0];
    assert_eq!(request.path, "/inspections/submit");
    let body = request.body.as_ref().unwrap();
    assert_eq!(body["jobId"], "job-1");
    assert_eq!(body["inspectionType"], "pre_trip");
    assert_eq!(body["tirePressure"], "32 psi");
    assert_eq!(body["passed"], true);
    assert_eq!(body["photos"][0]["type"], "damage");
}

#[tokio::test]
async fn offline_inspection_is_queued() {
    let harness = Harness::new(false);
    let screen = Inspection::new(&harness.ctx).unwrap();

    let outcome = screen.submit(form("job-1", "post_trip")).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Queued {
            reason: QueueReason::Offline,
            pending: 1
        }
    ));
    assert_eq!(harness.transport.request_count(), 0);
}
