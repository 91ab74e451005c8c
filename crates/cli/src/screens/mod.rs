// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Screen controllers.
//!
//! Every screen follows the same offline-first pattern, implemented once in
//! [`OfflineFirst`]: validate locally, check connectivity, drain anything
//! already queued, attempt the submission, and buffer the operation in the
//! screen's own queue when the device is offline, the failure is retryable,
//! or the earlier operations are still stuck. A [`Drainer`] replays the
//! queue when connectivity returns.

pub mod inspection;
pub mod job_assignment;
pub mod job_tracker;
pub mod vin_scanner;

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use towline_core::Operation;

use crate::error::Result;
use crate::sync::{
    submitter, ConnectivityMonitor, DrainOutcome, DrainPolicy, Drainer, DrainerHandle, EventBus,
    FailurePolicy, HttpTransport, Retryable, RetryQueue, SubmissionClient, SubmitError, SyncEvent,
    Transport,
};

pub use inspection::Inspection;
pub use job_assignment::JobAssignment;
pub use job_tracker::JobTracker;
pub use vin_scanner::VinScanner;

/// Names of every screen queue, in display order.
pub const QUEUE_NAMES: [&str; 4] = [
    vin_scanner::QUEUE,
    job_tracker::QUEUE,
    inspection::QUEUE,
    job_assignment::QUEUE,
];

/// Why an operation was buffered instead of submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueReason {
    /// The device was offline.
    Offline,
    /// Earlier operations of this screen could not be sent.
    Backlog,
    /// The request got no response.
    Network,
    /// No session token is stored.
    NotLoggedIn,
    /// The API answered with a retryable status.
    Server(u16),
}

impl fmt::Display for QueueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueReason::Offline => write!(f, "offline"),
            QueueReason::Backlog => write!(f, "earlier operations pending"),
            QueueReason::Network => write!(f, "network error"),
            QueueReason::NotLoggedIn => write!(f, "not logged in"),
            QueueReason::Server(status) => write!(f, "server returned {status}"),
        }
    }
}

/// Result of a screen action.
#[derive(Debug)]
pub enum Outcome {
    /// The API acknowledged the operation.
    Submitted { response: Option<Value> },
    /// The operation is waiting in the screen's queue.
    Queued { reason: QueueReason, pending: usize },
    /// Local validation failed; nothing was queued or sent.
    Rejected(towline_core::Error),
    /// The API rejected the operation permanently; it was moved to dead
    /// letters instead of being queued.
    DeadLettered { error: SubmitError },
}

impl Outcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Outcome::Submitted { .. })
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Outcome::Queued { .. })
    }
}

/// Shared dependencies for building screens.
pub struct ScreenContext<Tr: Transport = HttpTransport> {
    pub client: Arc<SubmissionClient<Tr>>,
    pub monitor: ConnectivityMonitor,
    pub events: EventBus,
    /// Directory for durable queues; `None` keeps queues in memory.
    pub queue_dir: Option<PathBuf>,
    pub policy: DrainPolicy,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl<Tr: Transport> ScreenContext<Tr> {
    /// Context with in-memory queues and default policy.
    pub fn new(client: Arc<SubmissionClient<Tr>>, monitor: ConnectivityMonitor) -> Self {
        ScreenContext {
            client,
            monitor,
            events: EventBus::new(),
            queue_dir: None,
            policy: DrainPolicy::default(),
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
        }
    }

    /// Open (or create) the queue named `name`.
    pub fn open_queue(&self, name: &str) -> Result<RetryQueue<Operation>> {
        let queue = match &self.queue_dir {
            Some(dir) => RetryQueue::open(dir, name)?,
            None => RetryQueue::in_memory(name),
        };
        Ok(queue.with_policy(self.policy))
    }
}

/// The offline-first submit pattern shared by every screen.
pub struct OfflineFirst<Tr: Transport = HttpTransport> {
    client: Arc<SubmissionClient<Tr>>,
    monitor: ConnectivityMonitor,
    drainer: Arc<Drainer<Operation>>,
    events: EventBus,
}

impl<Tr: Transport + 'static> OfflineFirst<Tr> {
    /// Build the flow for the queue named `name`.
    pub fn new(ctx: &ScreenContext<Tr>, name: &str) -> Result<Self> {
        let queue = Arc::new(ctx.open_queue(name)?);
        let drainer = Drainer::new(queue, submitter(Arc::clone(&ctx.client)), ctx.events.clone())
            .with_backoff(ctx.initial_delay, ctx.max_delay);
        Ok(OfflineFirst {
            client: Arc::clone(&ctx.client),
            monitor: ctx.monitor.clone(),
            drainer: Arc::new(drainer),
            events: ctx.events.clone(),
        })
    }

    pub fn name(&self) -> &str {
        self.queue().name()
    }

    pub fn queue(&self) -> &Arc<RetryQueue<Operation>> {
        self.drainer.queue()
    }

    pub fn drainer(&self) -> &Arc<Drainer<Operation>> {
        &self.drainer
    }

    pub fn client(&self) -> &Arc<SubmissionClient<Tr>> {
        &self.client
    }

    /// Number of operations waiting in this screen's queue.
    pub fn pending(&self) -> Result<usize> {
        Ok(self.queue().len()?)
    }

    /// Drain this screen's queue whenever connectivity returns.
    pub fn attach(&self) -> DrainerHandle {
        self.drainer.attach(&self.monitor)
    }

    /// Drain this screen's queue once.
    pub async fn drain_now(&self) -> Result<DrainOutcome> {
        Ok(self.drainer.drain_now().await?)
    }

    /// Validate, then submit or queue `op`.
    pub async fn submit(&self, op: Operation) -> Result<Outcome> {
        if let Err(e) = op.validate() {
            tracing::debug!(kind = %op.kind(), error = %e, "operation rejected");
            return Ok(Outcome::Rejected(e));
        }

        if !self.monitor.fetch_current().await {
            return self.enqueue(op, QueueReason::Offline);
        }

        // Keep push order: earlier queued operations get their attempt first.
        if !self.queue().is_empty()? {
            match self.drainer.drain_now().await? {
                DrainOutcome::Idle | DrainOutcome::Completed { .. } => {}
                DrainOutcome::AlreadyDraining => return self.enqueue(op, QueueReason::Backlog),
                DrainOutcome::Halted { .. } => {
                    let outcome = self.enqueue(op, QueueReason::Backlog)?;
                    self.drainer.schedule_retry();
                    return Ok(outcome);
                }
            }
        }

        match self.client.submit(&op).await {
            Ok(response) => Ok(Outcome::Submitted { response }),
            Err(e) if self.should_queue(&e) => {
                let reason = self.queue_reason(&e).await;
                let outcome = self.enqueue(op, reason)?;
                if reason != QueueReason::Offline {
                    self.drainer.schedule_retry();
                }
                Ok(outcome)
            }
            Err(e) => {
                let reason = e.to_string();
                self.queue().bury(op, reason.clone(), e.status())?;
                self.events.emit(SyncEvent::DeadLettered {
                    queue: self.name().to_string(),
                    reason,
                });
                Ok(Outcome::DeadLettered { error: e })
            }
        }
    }

    fn should_queue(&self, e: &SubmitError) -> bool {
        e.is_retryable()
            || (self.queue().policy().failure == FailurePolicy::HaltOnAny && e.status().is_some())
    }

    async fn queue_reason(&self, e: &SubmitError) -> QueueReason {
        match e {
            SubmitError::MissingCredential => QueueReason::NotLoggedIn,
            SubmitError::Server { status, .. } => QueueReason::Server(*status),
            _ => {
                if self.monitor.fetch_current().await {
                    QueueReason::Network
                } else {
                    QueueReason::Offline
                }
            }
        }
    }

    fn enqueue(&self, op: Operation, reason: QueueReason) -> Result<Outcome> {
        let kind = op.kind();
        let pending = self.queue().push(op)?;
        tracing::info!(queue = %self.name(), kind = %kind, pending, %reason, "operation queued");
        self.events.emit(SyncEvent::Queued {
            queue: self.name().to_string(),
            pending,
            reason: reason.to_string(),
        });
        Ok(Outcome::Queued { reason, pending })
    }
}

#[cfg(test)]
#[path = "offline_first_tests.rs"]
mod tests;
