// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first synchronization with the fleet API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  offline / retryable  ┌──────────────┐
//! │   Screen     │──────────────────────►│  RetryQueue  │
//! │ (OfflineFirst)                       │  (per screen)│
//! └──────┬───────┘                       └──────▲───────┘
//!        │ submit                               │ drain
//!        ▼                                      │
//! ┌──────────────┐     ┌─────────────┐   ┌──────┴───────┐
//! │ Submission   │────►│  Transport  │   │   Drainer    │◄── Connectivity
//! │   Client     │◄────│   (trait)   │   │ Idle/Draining│    Monitor
//! └──────────────┘     └─────────────┘   └──────────────┘
//! ```
//!
//! # Features
//!
//! - Per-screen FIFO retry queues, in memory or persisted as JSONL
//! - Drain on reconnect with an explicit Idle/Draining state
//! - Capped exponential backoff while connected
//! - Dead letters for operations the API rejects permanently
//! - Injectable transport and network probe for testing

mod client;
mod connectivity;
mod drainer;
mod events;
mod queue;
mod transport;

pub use client::{SubmissionClient, SubmitError, SubmitResult};
pub use connectivity::{ConnectivityMonitor, NetworkProbe, Subscription, TcpProbe};
pub use drainer::{submitter, Backoff, DrainOutcome, Drainer, DrainerHandle, SubmitFn};
pub use events::{EventBus, SyncEvent};
pub use queue::{
    DeadLetter, DrainPolicy, DrainReport, DrainState, Entry, FailurePolicy, QueueError,
    QueueResult, Retryable, RetryQueue,
};
pub use transport::{
    BoxFuture, HttpRequest, HttpResponse, HttpTransport, Method, Transport, TransportError,
    TransportResult,
};

#[cfg(test)]
pub(crate) mod test_helpers;
