// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the shared offline-first submit flow.

#![allow(clippy::unwrap_used)]

use super::testing::{eventually, Harness};
use super::*;
use crate::auth::StaticToken;
use crate::sync::test_helpers::{latitude_of, location, vin_scan, MockTransport};
use crate::sync::{BoxFuture, NetworkProbe};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use yare::parameterized;

const VIN: &str = "1HGCM82633A004352";

fn flow(harness: &Harness) -> OfflineFirst<MockTransport> {
    OfflineFirst::new(&harness.ctx, "job_tracker").unwrap()
}

/// Answers each check from a script, then stays offline.
struct ScriptedProbe(Mutex<VecDeque<bool>>);

impl ScriptedProbe {
    fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        ScriptedProbe(Mutex::new(answers.into_iter().collect()))
    }
}

impl NetworkProbe for ScriptedProbe {
    fn check(&self) -> BoxFuture<'_, bool> {
        let online = self.0.lock().unwrap().pop_front().unwrap_or(false);
        Box::pin(async move { online })
    }
}

#[tokio::test]
async fn offline_push_grows_queue_without_http() {
    let harness = Harness::new(false);
    let flow = flow(&harness);

    for expected in 1..=3 {
        let outcome = flow.submit(location(expected as f64)).await.unwrap();
        assert!(matches!(
            outcome,
            Outcome::Queued { reason: QueueReason::Offline, pending } if pending == expected
        ));
    }

    assert_eq!(harness.transport.request_count(), 0);
}

#[tokio::test]
async fn identical_payloads_are_two_entries() {
    let harness = Harness::new(false);
    let flow = flow(&harness);

    flow.submit(vin_scan(VIN)).await.unwrap();
    flow.submit(vin_scan(VIN)).await.unwrap();

    let entries = flow.queue().peek_all().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].item, entries[1].item);
    assert_ne!(entries[0].seq, entries[1].seq);
}

#[tokio::test]
async fn online_success_is_not_queued() {
    let harness = Harness::new(true);
    harness.transport.respond_json(201, json!({"ok": true}));
    let flow = flow(&harness);

    let outcome = flow.submit(location(1.0)).await.unwrap();

    match outcome {
        Outcome::Submitted { response } => assert_eq!(response, Some(json!({"ok": true}))),
        other => unreachable!("expected submission, got {other:?}"),
    }
    assert_eq!(flow.pending().unwrap(), 0);
}

#[tokio::test]
async fn invalid_operation_is_rejected_before_queueing() {
    let harness = Harness::new(false);
    let flow = flow(&harness);

    let outcome = flow
        .submit(Operation::from(towline_core::JobComplete {
            job_id: String::new(),
            tracking_path: vec![],
            completed_at: chrono::Utc::now(),
        }))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Rejected(_)));
    assert_eq!(flow.pending().unwrap(), 0);
    assert_eq!(harness.probe.checks(), 0);
}

#[parameterized(
    service_unavailable = { 503 },
    internal = { 500 },
    request_timeout = { 408 },
    too_many_requests = { 429 },
    unauthorized = { 401 },
)]
fn retryable_status_is_queued(status: u16) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let harness = Harness::new(true);
        harness.transport.respond(status);
        let flow = flow(&harness);

        let outcome = flow.submit(location(1.0)).await.unwrap();

        assert!(matches!(
            outcome,
            Outcome::Queued { reason: QueueReason::Server(s), pending: 1 } if s == status
        ));
        assert_eq!(harness.transport.request_count(), 1);
    });
}

#[parameterized(
    bad_request = { 400 },
    forbidden = { 403 },
    not_found = { 404 },
    unprocessable = { 422 },
)]
fn permanent_status_is_dead_lettered(status: u16) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let harness = Harness::new(true);
        harness
            .transport
            .respond_json(status, json!({"error": "rejected"}));
        let flow = flow(&harness);
        let mut rx = harness.ctx.events.subscribe();

        let outcome = flow.submit(location(4.0)).await.unwrap();

        match outcome {
            Outcome::DeadLettered { error } => {
                assert_eq!(error.status(), Some(status));
                assert!(error.has_response_body());
            }
            other => unreachable!("expected dead letter, got {other:?}"),
        }
        assert_eq!(flow.pending().unwrap(), 0);
        let dead = flow.queue().dead_letters().unwrap();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].status, Some(status));
        assert_eq!(latitude_of(&dead[0].item), 4.0);
        assert!(matches!(
            rx.recv().await.unwrap(),
            SyncEvent::DeadLettered { .. }
        ));
    });
}

#[tokio::test]
async fn halt_on_any_queues_permanent_failures() {
    let mut harness = Harness::new(true);
    harness.ctx.policy = DrainPolicy {
        failure: FailurePolicy::HaltOnAny,
        max_attempts: None,
    };
    harness.transport.respond(422);
    let flow = flow(&harness);

    let outcome = flow.submit(location(1.0)).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Queued {
            reason: QueueReason::Server(422),
            pending: 1
        }
    ));
    assert!(flow.queue().dead_letters().unwrap().is_empty());
}

#[tokio::test]
async fn missing_token_is_queued_as_not_logged_in() {
    let harness = Harness::with_credentials(true, Arc::new(StaticToken::none()));
    let flow = flow(&harness);

    let outcome = flow.submit(location(1.0)).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Queued {
            reason: QueueReason::NotLoggedIn,
            pending: 1
        }
    ));
    assert_eq!(harness.transport.request_count(), 0);
}

#[tokio::test]
async fn network_failure_while_connected_is_network() {
    let harness = Harness::new(true);
    harness.transport.fail();
    let flow = flow(&harness);

    let outcome = flow.submit(location(1.0)).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Queued {
            reason: QueueReason::Network,
            pending: 1
        }
    ));
}

#[tokio::test]
async fn network_failure_after_dropping_offline_is_offline() {
    let transport = MockTransport::new();
    transport.fail();
    let client = Arc::new(SubmissionClient::with_transport(
        transport.clone(),
        Arc::new(StaticToken::new("tok")),
    ));
    // Online for the pre-submit check, offline for the re-check.
    let probe = ScriptedProbe::new([true, false]);
    let ctx = ScreenContext::new(client, ConnectivityMonitor::new(Arc::new(probe)));
    let flow = OfflineFirst::new(&ctx, "job_tracker").unwrap();

    let outcome = flow.submit(location(1.0)).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Queued {
            reason: QueueReason::Offline,
            pending: 1
        }
    ));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn backlog_is_drained_before_submitting() {
    let harness = Harness::new(false);
    let flow = flow(&harness);
    flow.submit(location(1.0)).await.unwrap();

    harness.probe.set(true);
    let outcome = flow.submit(location(2.0)).await.unwrap();

    assert!(outcome.is_submitted());
    assert_eq!(flow.pending().unwrap(), 0);
    let sent: Vec<f64> = harness
        .transport
        .bodies()
        .iter()
        .map(|b| b["latitude"].as_f64().unwrap())
        .collect();
    assert_eq!(sent, vec![1.0, 2.0]);
}

#[tokio::test]
async fn stuck_backlog_queues_without_attempt() {
    let harness = Harness::new(false);
    let flow = flow(&harness);
    flow.submit(location(1.0)).await.unwrap();

    harness.probe.set(true);
    harness.transport.respond(503);
    let outcome = flow.submit(location(2.0)).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Queued {
            reason: QueueReason::Backlog,
            pending: 2
        }
    ));
    assert_eq!(harness.transport.request_count(), 1);
    let queued: Vec<f64> = flow
        .queue()
        .peek_all()
        .unwrap()
        .iter()
        .map(|e| latitude_of(&e.item))
        .collect();
    assert_eq!(queued, vec![1.0, 2.0]);
}

#[tokio::test]
async fn backlog_drains_inline_while_retry_is_pending() {
    let mut harness = Harness::new(true);
    harness.ctx.initial_delay = Duration::from_secs(10);
    harness.ctx.max_delay = Duration::from_secs(10);
    harness.transport.respond(503);
    let flow = flow(&harness);
    harness.ctx.monitor.report(true);
    let _handle = flow.attach();
    tokio::task::yield_now().await;

    // Queued behind a long backoff; the next submit clears it inline.
    let first = flow.submit(location(1.0)).await.unwrap();
    assert!(first.is_queued());
    let second = flow.submit(location(2.0)).await.unwrap();
    assert!(second.is_submitted());

    assert_eq!(flow.pending().unwrap(), 0);
    let sent: Vec<f64> = harness
        .transport
        .bodies()
        .iter()
        .map(|b| b["latitude"].as_f64().unwrap())
        .collect();
    assert_eq!(sent, vec![1.0, 1.0, 2.0]);
}

#[tokio::test]
async fn retryable_failure_schedules_attached_retry() {
    let harness = Harness::new(true);
    harness.transport.respond(503);
    let flow = flow(&harness);
    harness.ctx.monitor.report(true);
    let _handle = flow.attach();
    let mut rx = harness.ctx.events.subscribe();

    let outcome = flow.submit(location(1.0)).await.unwrap();
    assert!(outcome.is_queued());

    eventually(|| flow.pending().unwrap() == 0).await;
    assert_eq!(harness.transport.request_count(), 2);
    let mut scheduled = false;
    while let Ok(event) = rx.try_recv() {
        scheduled |= matches!(event, SyncEvent::RetryScheduled { .. });
    }
    assert!(scheduled);
}

#[tokio::test]
async fn queued_event_carries_reason() {
    let harness = Harness::new(false);
    let flow = flow(&harness);
    let mut rx = harness.ctx.events.subscribe();

    flow.submit(location(1.0)).await.unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        SyncEvent::Queued {
            queue: "job_tracker".into(),
            pending: 1,
            reason: "offline".into(),
        }
    );
}

#[test]
fn durable_queue_used_when_dir_set() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::new(false);
    harness.ctx.queue_dir = Some(dir.path().to_path_buf());

    let queue = harness.ctx.open_queue("inspection").unwrap();

    assert!(queue.is_durable());
    assert_eq!(queue.name(), "inspection");
}

#[test]
fn queue_names_are_distinct() {
    let mut names = QUEUE_NAMES.to_vec();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), QUEUE_NAMES.len());
}
