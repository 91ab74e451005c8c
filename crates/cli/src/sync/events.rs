// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User-visible sync notifications.

use std::time::Duration;

use tokio::sync::broadcast;

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// An operation was buffered instead of submitted.
    Queued {
        queue: String,
        pending: usize,
        reason: String,
    },
    /// A drain pass started.
    DrainStarted { queue: String, pending: usize },
    /// A drain pass emptied its queue.
    DrainCompleted {
        queue: String,
        submitted: usize,
        dead_lettered: usize,
    },
    /// A drain pass stopped on a failure; the queue is kept.
    DrainHalted {
        queue: String,
        submitted: usize,
        remaining: usize,
        error: String,
    },
    /// A drain retry was scheduled.
    RetryScheduled { queue: String, delay: Duration },
    /// An operation was rejected permanently and moved to dead letters.
    DeadLettered { queue: String, reason: String },
}

impl SyncEvent {
    pub fn queue(&self) -> &str {
        match self {
            SyncEvent::Queued { queue, .. }
            | SyncEvent::DrainStarted { queue, .. }
            | SyncEvent::DrainCompleted { queue, .. }
            | SyncEvent::DrainHalted { queue, .. }
            | SyncEvent::RetryScheduled { queue, .. }
            | SyncEvent::DeadLettered { queue, .. } => queue,
        }
    }
}

const CAPACITY: usize = 256;

/// Fan-out of [`SyncEvent`]s. Clones share the channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SyncEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        EventBus { tx }
    }

    /// Publish an event. Events with no listener are dropped.
    pub fn emit(&self, event: SyncEvent) {
        tracing::debug!(?event, "sync event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }
}
