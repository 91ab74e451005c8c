// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring.
//!
//! A [`ConnectivityMonitor`] wraps a [`NetworkProbe`] and tells subscribers
//! whenever the connected state changes. Changes are forwarded as soon as
//! they are observed; flapping is reported as-is.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::transport::{BoxFuture, TransportError, TransportResult};

/// A one-shot check of whether the API is reachable.
pub trait NetworkProbe: Send + Sync {
    fn check(&self) -> BoxFuture<'_, bool>;
}

/// Probe that opens a TCP connection to the API host.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        TcpProbe {
            addr: addr.into(),
            timeout,
        }
    }

    /// Probe the host and port of an API base URL.
    pub fn from_url(url: &str, timeout: Duration) -> TransportResult<Self> {
        let parsed = reqwest::Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| TransportError::InvalidUrl(format!("{url}: missing host")))?;
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| TransportError::InvalidUrl(format!("{url}: missing port")))?;
        Ok(TcpProbe::new(format!("{host}:{port}"), timeout))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl NetworkProbe for TcpProbe {
    fn check(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            matches!(
                tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await,
                Ok(Ok(_))
            )
        })
    }
}

type Callback = Arc<dyn Fn(bool) + Send + Sync>;

struct Inner {
    probe: Arc<dyn NetworkProbe>,
    subscribers: Mutex<Vec<(u64, Callback)>>,
    next_id: AtomicU64,
    last: Mutex<Option<bool>>,
    /// Held from a state change until its callbacks have run.
    notify: Mutex<()>,
}

impl Inner {
    fn subscribers(&self) -> MutexGuard<'_, Vec<(u64, Callback)>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn last(&self) -> MutexGuard<'_, Option<bool>> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tracks connectivity and notifies subscribers of changes.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<Inner>,
}

/// Keeps a callback registered. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.subscribers().retain(|(id, _)| *id != self.id);
        }
    }
}

impl ConnectivityMonitor {
    pub fn new(probe: Arc<dyn NetworkProbe>) -> Self {
        ConnectivityMonitor {
            inner: Arc::new(Inner {
                probe,
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                last: Mutex::new(None),
                notify: Mutex::new(()),
            }),
        }
    }

    /// Call `callback` with the new state on every change.
    pub fn subscribe(&self, callback: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers().push((id, Arc::new(callback)));
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers().len()
    }

    /// Ask the probe directly. Does not notify subscribers.
    pub async fn fetch_current(&self) -> bool {
        self.inner.probe.check().await
    }

    /// Last state reported, if any.
    pub fn last_known(&self) -> Option<bool> {
        *self.inner.last()
    }

    /// Record an observed state. Subscribers are notified only when it
    /// differs from the last one (the first report always notifies).
    ///
    /// Concurrent reports are delivered one at a time in the order their
    /// state was recorded, so the last callback agrees with
    /// [`last_known`](Self::last_known). Callbacks must not report.
    pub fn report(&self, connected: bool) {
        let _notify = self.inner.notify.lock().unwrap_or_else(PoisonError::into_inner);
        {
            let mut last = self.inner.last();
            if *last == Some(connected) {
                return;
            }
            *last = Some(connected);
        }
        tracing::info!(connected, "connectivity changed");

        let callbacks: Vec<Callback> = self
            .inner
            .subscribers()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(connected);
        }
    }

    /// Probe once and report the result.
    pub async fn poll_once(&self) -> bool {
        let connected = self.fetch_current().await;
        self.report(connected);
        connected
    }

    /// Poll the probe every `interval` until the task is aborted.
    pub fn watch(&self, interval: Duration) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                monitor.poll_once().await;
            }
        })
    }
}
