// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync drainer: replays a retry queue when connectivity returns.
//!
//! A drainer is `Idle` or `Draining` (the state of its queue). It moves to
//! `Draining` on a transition to connected while the queue is non-empty,
//! or on an explicit [`Drainer::drain_now`], and back to `Idle` when the
//! queue empties or a submission fails. A request to drain while already
//! draining is rejected, never run concurrently.
//!
//! After a halted pass the drainer retries with capped exponential backoff
//! for as long as it stays connected. A connectivity change resets the
//! backoff.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use towline_core::Operation;

use super::client::{SubmissionClient, SubmitError};
use super::connectivity::{ConnectivityMonitor, Subscription};
use super::events::{EventBus, SyncEvent};
use super::queue::{DrainState, QueueError, QueueResult, RetryQueue};
use super::transport::{BoxFuture, Transport};

/// Submits one queued item.
pub type SubmitFn<T> =
    Arc<dyn Fn(T) -> BoxFuture<'static, Result<(), SubmitError>> + Send + Sync>;

/// Submit function posting operations through `client`.
pub fn submitter<Tr>(client: Arc<SubmissionClient<Tr>>) -> SubmitFn<Operation>
where
    Tr: Transport + 'static,
{
    Arc::new(move |op: Operation| -> BoxFuture<'static, Result<(), SubmitError>> {
        let client = Arc::clone(&client);
        Box::pin(async move { client.submit(&op).await.map(|_| ()) })
    })
}

/// Capped exponential backoff.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let max = max.max(initial);
        Backoff {
            initial,
            max,
            current: initial,
        }
    }

    /// Delay before the next attempt; doubles up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = std::cmp::min(self.current.saturating_mul(2), self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Result of a drain request.
#[derive(Debug)]
pub enum DrainOutcome {
    /// Nothing was queued.
    Idle,
    /// Another pass holds the queue.
    AlreadyDraining,
    /// The queue was emptied.
    Completed {
        submitted: usize,
        dead_lettered: usize,
    },
    /// A failure stopped the pass; the failed entry and its successors stay
    /// queued.
    Halted {
        submitted: usize,
        dead_lettered: usize,
        remaining: usize,
        error: SubmitError,
    },
}

enum Signal {
    Connectivity(bool),
    Nudge,
    Schedule,
    Retry,
    Shutdown,
}

/// Drains one queue through a submit function.
pub struct Drainer<T> {
    queue: Arc<RetryQueue<T>>,
    submit: SubmitFn<T>,
    events: EventBus,
    initial_delay: Duration,
    max_delay: Duration,
    signals: Mutex<Option<mpsc::UnboundedSender<Signal>>>,
}

/// A drainer attached to a connectivity monitor.
///
/// Dropping the handle stops the background task immediately; use
/// [`DrainerHandle::shutdown`] to let an in-flight pass finish first.
pub struct DrainerHandle {
    task: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Signal>,
    _subscription: Subscription,
}

impl DrainerHandle {
    /// Stop once the current drain pass (if any) has finished.
    pub async fn shutdown(mut self) {
        let _ = self.tx.send(Signal::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for DrainerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drainer<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + 'static,
{
    pub fn new(queue: Arc<RetryQueue<T>>, submit: SubmitFn<T>, events: EventBus) -> Self {
        Drainer {
            queue,
            submit,
            events,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
            signals: Mutex::new(None),
        }
    }

    /// Set the retry backoff used while attached.
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_delay = initial;
        self.max_delay = max;
        self
    }

    pub fn queue(&self) -> &Arc<RetryQueue<T>> {
        &self.queue
    }

    pub fn state(&self) -> DrainState {
        self.queue.drain_state()
    }

    /// Run one drain pass now, if there is anything to drain.
    pub async fn drain_now(&self) -> QueueResult<DrainOutcome> {
        if self.state() == DrainState::Draining {
            return Ok(DrainOutcome::AlreadyDraining);
        }
        let pending = self.queue.len()?;
        if pending == 0 {
            return Ok(DrainOutcome::Idle);
        }

        let name = self.queue.name().to_string();
        tracing::info!(queue = %name, pending, "draining queue");
        self.events.emit(SyncEvent::DrainStarted {
            queue: name.clone(),
            pending,
        });

        let submit = Arc::clone(&self.submit);
        let report = match self.queue.drain(move |item| (*submit)(item)).await {
            Ok(report) => report,
            Err(QueueError::AlreadyDraining(_)) => return Ok(DrainOutcome::AlreadyDraining),
            Err(e) => return Err(e),
        };

        match report.halted {
            None => {
                tracing::info!(queue = %name, submitted = report.submitted, "queue drained");
                self.events.emit(SyncEvent::DrainCompleted {
                    queue: name,
                    submitted: report.submitted,
                    dead_lettered: report.dead_lettered,
                });
                Ok(DrainOutcome::Completed {
                    submitted: report.submitted,
                    dead_lettered: report.dead_lettered,
                })
            }
            Some(error) => {
                tracing::warn!(
                    queue = %name,
                    submitted = report.submitted,
                    remaining = report.remaining,
                    error = %error,
                    "drain halted"
                );
                self.events.emit(SyncEvent::DrainHalted {
                    queue: name,
                    submitted: report.submitted,
                    remaining: report.remaining,
                    error: error.to_string(),
                });
                Ok(DrainOutcome::Halted {
                    submitted: report.submitted,
                    dead_lettered: report.dead_lettered,
                    remaining: report.remaining,
                    error,
                })
            }
        }
    }

    /// Drain on every transition to connected until the handle is dropped.
    pub fn attach(self: &Arc<Self>, monitor: &ConnectivityMonitor) -> DrainerHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = tx.clone();
        let subscription = monitor.subscribe(move |connected| {
            let _ = sink.send(Signal::Connectivity(connected));
        });
        *self.signals.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx.clone());

        let connected = monitor.last_known().unwrap_or(false);
        if connected {
            let _ = tx.send(Signal::Nudge);
        }

        let this = Arc::clone(self);
        let task = tokio::spawn(async move { this.run(rx, connected).await });
        DrainerHandle {
            task: Some(task),
            tx,
            _subscription: subscription,
        }
    }

    fn signal(&self, signal: Signal) {
        if let Some(tx) = &*self.signals.lock().unwrap_or_else(PoisonError::into_inner) {
            let _ = tx.send(signal);
        }
    }

    /// Drain now if attached and connected.
    pub fn nudge(&self) {
        self.signal(Signal::Nudge);
    }

    /// Schedule a backoff retry if attached, connected and none is pending.
    pub fn schedule_retry(&self) {
        self.signal(Signal::Schedule);
    }

    fn schedule(&self, backoff: &mut Backoff) -> Instant {
        let delay = backoff.next_delay();
        tracing::info!(
            queue = %self.queue.name(),
            delay_ms = delay.as_millis() as u64,
            "drain retry scheduled"
        );
        self.events.emit(SyncEvent::RetryScheduled {
            queue: self.queue.name().to_string(),
            delay,
        });
        Instant::now() + delay
    }

    async fn run(self: Arc<Self>, mut rx: mpsc::UnboundedReceiver<Signal>, mut connected: bool) {
        let mut backoff = Backoff::new(self.initial_delay, self.max_delay);
        let mut retry_at: Option<Instant> = None;

        loop {
            let signal = match retry_at {
                Some(at) => tokio::select! {
                    s = rx.recv() => s,
                    _ = tokio::time::sleep_until(at) => Some(Signal::Retry),
                },
                None => rx.recv().await,
            };
            let Some(signal) = signal else { break };

            match signal {
                Signal::Shutdown => break,
                Signal::Connectivity(c) => {
                    connected = c;
                    backoff.reset();
                    retry_at = None;
                }
                Signal::Schedule => {
                    if connected && retry_at.is_none() {
                        retry_at = Some(self.schedule(&mut backoff));
                    }
                    continue;
                }
                Signal::Nudge | Signal::Retry => {}
            }
            if !connected {
                continue;
            }

            retry_at = None;
            match self.drain_now().await {
                Ok(DrainOutcome::Idle) | Ok(DrainOutcome::Completed { .. }) => backoff.reset(),
                Ok(DrainOutcome::Halted { .. }) | Ok(DrainOutcome::AlreadyDraining) => {
                    retry_at = Some(self.schedule(&mut backoff));
                }
                Err(e) => {
                    tracing::error!(queue = %self.queue.name(), error = %e, "drain failed");
                    retry_at = Some(self.schedule(&mut backoff));
                }
            }
        }
        tracing::debug!(queue = %self.queue.name(), "drainer stopped");
    }
}
