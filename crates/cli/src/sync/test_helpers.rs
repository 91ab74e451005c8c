// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync and screen tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use serde_json::Value;
use towline_core::{LocationUpdate, Operation, PhotoKind, PhotoRef, Vin, VinScan};

use super::connectivity::NetworkProbe;
use super::transport::{
    BoxFuture, HttpRequest, HttpResponse, Transport, TransportError, TransportResult,
};

/// Mock transport for testing without real sockets.
///
/// Records every request and answers from a script. Once the script runs
/// out every request gets `200` with no body. Clones share state.
#[derive(Clone, Default)]
pub struct MockTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    responses: Arc<Mutex<VecDeque<TransportResult<HttpResponse>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next request with `status` and no body.
    pub fn respond(&self, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse { status, body: None }));
    }

    /// Answer the next request with `status` and a JSON body.
    pub fn respond_json(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: Some(body),
        }));
    }

    /// Fail the next request without a response.
    pub fn fail(&self) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::ConnectionFailed("mock failure".into())));
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Request bodies sent so far, in order.
    pub fn bodies(&self) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter_map(|r| r.body)
            .collect()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult<HttpResponse>> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        Box::pin(async move {
            next.unwrap_or(Ok(HttpResponse {
                status: 200,
                body: None,
            }))
        })
    }

    fn base_url(&self) -> &str {
        "mock://fleet"
    }
}

/// Probe whose answer is switched by the test.
#[derive(Clone, Default)]
pub struct ManualProbe {
    online: Arc<AtomicBool>,
    checks: Arc<AtomicUsize>,
}

impl ManualProbe {
    pub fn new(online: bool) -> Self {
        let probe = Self::default();
        probe.set(online);
        probe
    }

    pub fn set(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl NetworkProbe for ManualProbe {
    fn check(&self) -> BoxFuture<'_, bool> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        let online = self.online.load(Ordering::SeqCst);
        Box::pin(async move { online })
    }
}

/// A location update whose latitude identifies it.
pub fn location(latitude: f64) -> Operation {
    Operation::from(LocationUpdate {
        latitude,
        longitude: -117.16,
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        speed: 12.5,
    })
}

/// A VIN scan with one front photo.
pub fn vin_scan(vin: &str) -> Operation {
    Operation::from(VinScan {
        vin: Vin::parse(vin).unwrap(),
        photos: vec![PhotoRef::new(
            "file:///photos/front.jpg",
            PhotoKind::Front,
            Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        )],
    })
}

/// Latitude of a queued location update, for asserting order.
pub fn latitude_of(op: &Operation) -> f64 {
    match op {
        Operation::LocationUpdate(p) => p.latitude,
        other => panic!("expected location update, got {:?}", other.kind()),
    }
}
