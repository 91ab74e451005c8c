// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry queue for operations that could not be submitted yet.
//!
//! A [`RetryQueue`] is a FIFO of entries waiting for the API. It is either
//! held in memory (lost on restart) or backed by files in a queue
//! directory:
//!
//! - `<name>.jsonl` - append-only log of entries, one JSON line each
//! - `<name>.checkpoint` - `{head_seq, next_seq, head_failures}`; entries below `head_seq`
//!   have been drained
//! - `<name>.dead.jsonl` - dead letters
//! - `<name>.lock` / `<name>.drain.lock` - advisory locks
//!
//! Durable queues treat the files as the source of truth so that several
//! processes can share a queue directory. Every mutation runs under an
//! exclusive lock on `<name>.lock`, and a drain holds `<name>.drain.lock`
//! for its whole pass.

use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use towline_core::jsonl;

/// Drained entries tolerated at the head of a log before it is rewritten.
const COMPACT_AFTER: usize = 64;

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Log or dead-letter file could not be read back.
    #[error("queue storage error: {0}")]
    Storage(#[from] towline_core::Error),

    /// A drain of this queue is already running.
    #[error("queue '{0}' is already draining")]
    AlreadyDraining(String),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Failure reported by a submit function during a drain.
pub trait Retryable: fmt::Display {
    /// Whether a later attempt could succeed.
    fn is_retryable(&self) -> bool;

    /// HTTP status, when the failure came from a response.
    fn status(&self) -> Option<u16> {
        None
    }
}

/// What a drain does with a failed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Permanent failures are dead-lettered and the drain moves on.
    /// Retryable failures halt the drain.
    #[default]
    DeadLetterPermanent,
    /// Every failure halts the drain and the entry stays at the head.
    HaltOnAny,
}

/// Drain behavior for a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainPolicy {
    pub failure: FailurePolicy,
    /// Dead-letter an entry after this many retryable failures.
    pub max_attempts: Option<u32>,
}

/// Whether a queue is currently being drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    Idle,
    Draining,
}

/// A queued item with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<T> {
    /// Position in the queue's history. Not a dedup key.
    pub seq: u64,
    pub enqueued_at: DateTime<Utc>,
    /// Failed submissions so far. Durable queues keep the count in the
    /// checkpoint, not in the log.
    #[serde(skip)]
    pub attempts: u32,
    pub item: T,
}

/// An item removed from the retry path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetter<T> {
    pub seq: Option<u64>,
    pub item: T,
    pub reason: String,
    pub status: Option<u16>,
    pub attempts: u32,
    pub dead_at: DateTime<Utc>,
}

/// Result of one drain pass.
#[derive(Debug)]
pub struct DrainReport<E> {
    /// Entries acknowledged and removed.
    pub submitted: usize,
    /// Entries moved to dead letters.
    pub dead_lettered: usize,
    /// Entries left in the queue.
    pub remaining: usize,
    /// The failure that stopped the pass early, if any.
    pub halted: Option<E>,
}

impl<E> DrainReport<E> {
    fn new() -> Self {
        DrainReport {
            submitted: 0,
            dead_lettered: 0,
            remaining: 0,
            halted: None,
        }
    }
}

/// Persisted drain position of a durable queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Checkpoint {
    /// Entries with a lower seq have been drained.
    head_seq: u64,
    /// Seq assigned to the next push.
    next_seq: u64,
    /// Retryable failures recorded against the head entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    head_failures: Option<HeadFailures>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HeadFailures {
    seq: u64,
    attempts: u32,
}

impl Checkpoint {
    fn attempts_for(&self, seq: u64) -> u32 {
        match self.head_failures {
            Some(f) if f.seq == seq => f.attempts,
            _ => 0,
        }
    }
}

struct MemoryStore<T> {
    entries: VecDeque<Entry<T>>,
    next_seq: u64,
    dead: Vec<DeadLetter<T>>,
}

struct DurableStore {
    log: PathBuf,
    checkpoint: PathBuf,
    dead: PathBuf,
    lock: PathBuf,
    drain_lock: PathBuf,
}

enum Store<T> {
    Memory(MemoryStore<T>),
    Durable(DurableStore),
}

/// FIFO retry queue, drained head-first.
pub struct RetryQueue<T> {
    name: String,
    store: Mutex<Store<T>>,
    policy: DrainPolicy,
    draining: AtomicBool,
}

impl<T> RetryQueue<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Create a queue that lives only as long as the process.
    pub fn in_memory(name: &str) -> Self {
        RetryQueue {
            name: name.to_string(),
            store: Mutex::new(Store::Memory(MemoryStore {
                entries: VecDeque::new(),
                next_seq: 0,
                dead: Vec::new(),
            })),
            policy: DrainPolicy::default(),
            draining: AtomicBool::new(false),
        }
    }

    /// Create or open a durable queue named `name` inside `dir`.
    pub fn open(dir: &Path, name: &str) -> QueueResult<Self> {
        fs::create_dir_all(dir)?;
        let store = DurableStore {
            log: dir.join(format!("{name}.jsonl")),
            checkpoint: dir.join(format!("{name}.checkpoint")),
            dead: dir.join(format!("{name}.dead.jsonl")),
            lock: dir.join(format!("{name}.lock")),
            drain_lock: dir.join(format!("{name}.drain.lock")),
        };
        // Ensure the log exists (create if not)
        OpenOptions::new().create(true).append(true).open(&store.log)?;

        Ok(RetryQueue {
            name: name.to_string(),
            store: Mutex::new(Store::Durable(store)),
            policy: DrainPolicy::default(),
            draining: AtomicBool::new(false),
        })
    }

    /// Replace the drain policy.
    pub fn with_policy(mut self, policy: DrainPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> DrainPolicy {
        self.policy
    }

    pub fn is_durable(&self) -> bool {
        matches!(*self.lock(), Store::Durable(_))
    }

    fn lock(&self) -> MutexGuard<'_, Store<T>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an item to the tail. Returns the new queue length.
    ///
    /// Identical items pushed twice become two entries.
    pub fn push(&self, item: T) -> QueueResult<usize> {
        let mut store = self.lock();
        let len = match &mut *store {
            Store::Memory(mem) => {
                let seq = mem.next_seq;
                mem.next_seq += 1;
                mem.entries.push_back(Entry {
                    seq,
                    enqueued_at: Utc::now(),
                    attempts: 0,
                    item,
                });
                mem.entries.len()
            }
            Store::Durable(disk) => disk.with_lock(|| {
                disk.repair_tail()?;
                let (live, _, mut ckpt) = disk.load::<T>()?;
                let entry = Entry {
                    seq: ckpt.next_seq,
                    enqueued_at: Utc::now(),
                    attempts: 0,
                    item,
                };
                jsonl::append(&disk.log, &entry)?;
                ckpt.next_seq += 1;
                disk.write_checkpoint(&ckpt)?;
                Ok(live.len() + 1)
            })?,
        };
        tracing::debug!(queue = %self.name, pending = len, "queued operation");
        Ok(len)
    }

    /// Number of queued entries.
    pub fn len(&self) -> QueueResult<usize> {
        match &*self.lock() {
            Store::Memory(mem) => Ok(mem.entries.len()),
            Store::Durable(disk) => Ok(disk.load::<T>()?.0.len()),
        }
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of all queued entries, head first.
    pub fn peek_all(&self) -> QueueResult<Vec<Entry<T>>> {
        match &*self.lock() {
            Store::Memory(mem) => Ok(mem.entries.iter().cloned().collect()),
            Store::Durable(disk) => {
                let (mut live, _, ckpt) = disk.load::<T>()?;
                for entry in &mut live {
                    entry.attempts = ckpt.attempts_for(entry.seq);
                }
                Ok(live)
            }
        }
    }

    fn head(&self) -> QueueResult<Option<Entry<T>>> {
        match &*self.lock() {
            Store::Memory(mem) => Ok(mem.entries.front().cloned()),
            Store::Durable(disk) => {
                let (live, _, ckpt) = disk.load::<T>()?;
                Ok(live.into_iter().next().map(|mut e| {
                    e.attempts = ckpt.attempts_for(e.seq);
                    e
                }))
            }
        }
    }

    /// Items that will not be retried.
    pub fn dead_letters(&self) -> QueueResult<Vec<DeadLetter<T>>> {
        match &*self.lock() {
            Store::Memory(mem) => Ok(mem.dead.clone()),
            Store::Durable(disk) => Ok(jsonl::read_all(&disk.dead)?),
        }
    }

    /// Record an item as dead without it ever having been queued.
    pub fn bury(&self, item: T, reason: String, status: Option<u16>) -> QueueResult<()> {
        let letter = DeadLetter {
            seq: None,
            item,
            reason,
            status,
            attempts: 1,
            dead_at: Utc::now(),
        };
        self.append_dead(letter)
    }

    fn append_dead(&self, letter: DeadLetter<T>) -> QueueResult<()> {
        tracing::warn!(queue = %self.name, status = ?letter.status, reason = %letter.reason, "dead-lettered operation");
        let mut store = self.lock();
        match &mut *store {
            Store::Memory(mem) => {
                mem.dead.push(letter);
                Ok(())
            }
            Store::Durable(disk) => disk.with_lock(|| Ok(jsonl::append(&disk.dead, &letter)?)),
        }
    }

    /// Remove the head if it is still `seq`.
    fn remove_head(&self, seq: u64) -> QueueResult<()> {
        let mut store = self.lock();
        match &mut *store {
            Store::Memory(mem) => {
                if mem.entries.front().is_some_and(|e| e.seq == seq) {
                    mem.entries.pop_front();
                }
                Ok(())
            }
            Store::Durable(disk) => disk.with_lock(|| disk.advance_head::<T>(seq)),
        }
    }

    /// Count a failed attempt against the head. Returns the new count.
    fn record_failure(&self, seq: u64) -> QueueResult<u32> {
        let mut store = self.lock();
        match &mut *store {
            Store::Memory(mem) => match mem.entries.front_mut() {
                Some(e) if e.seq == seq => {
                    e.attempts += 1;
                    Ok(e.attempts)
                }
                _ => Ok(0),
            },
            Store::Durable(disk) => disk.with_lock(|| {
                let mut ckpt = disk.read_checkpoint()?;
                let attempts = ckpt.attempts_for(seq) + 1;
                ckpt.head_failures = Some(HeadFailures { seq, attempts });
                disk.write_checkpoint(&ckpt)?;
                Ok(attempts)
            }),
        }
    }

    fn dead_letter_head(&self, entry: Entry<T>, reason: String, status: Option<u16>) -> QueueResult<()> {
        self.remove_head(entry.seq)?;
        self.append_dead(DeadLetter {
            seq: Some(entry.seq),
            item: entry.item,
            reason,
            status,
            attempts: entry.attempts + 1,
            dead_at: Utc::now(),
        })
    }

    /// Current drain state.
    pub fn drain_state(&self) -> DrainState {
        if self.draining.load(Ordering::Acquire) {
            DrainState::Draining
        } else {
            DrainState::Idle
        }
    }

    fn begin_drain(&self) -> QueueResult<DrainGuard<'_>> {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(QueueError::AlreadyDraining(self.name.clone()));
        }
        let mut guard = DrainGuard {
            flag: &self.draining,
            _file: None,
        };

        let drain_lock = match &*self.lock() {
            Store::Memory(_) => None,
            Store::Durable(disk) => Some(disk.drain_lock.clone()),
        };
        if let Some(path) = drain_lock {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(false)
                .open(path)?;
            if file.try_lock_exclusive().is_err() {
                return Err(QueueError::AlreadyDraining(self.name.clone()));
            }
            guard._file = Some(file);
        }
        Ok(guard)
    }

    /// Submit queued entries head-first.
    ///
    /// Each entry is passed to `submit` at most once per pass. On success
    /// the entry is removed and the pass continues. A retryable failure (or
    /// any failure under [`FailurePolicy::HaltOnAny`]) stops the pass and
    /// leaves that entry and everything after it queued, in order. A
    /// permanent failure moves the entry to dead letters and the pass
    /// continues.
    ///
    /// Items pushed while the pass is running are drained in the same pass.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AlreadyDraining`] if another pass holds the
    /// queue, or a storage error.
    pub async fn drain<F, Fut, E>(&self, mut submit: F) -> QueueResult<DrainReport<E>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Retryable,
    {
        let _guard = self.begin_drain()?;
        let mut report = DrainReport::new();

        while let Some(entry) = self.head()? {
            match submit(entry.item.clone()).await {
                Ok(()) => {
                    self.remove_head(entry.seq)?;
                    report.submitted += 1;
                }
                Err(e) => {
                    let permanent = !e.is_retryable()
                        && self.policy.failure == FailurePolicy::DeadLetterPermanent;
                    if permanent {
                        self.dead_letter_head(entry, e.to_string(), e.status())?;
                        report.dead_lettered += 1;
                        continue;
                    }

                    let attempts = self.record_failure(entry.seq)?;
                    tracing::debug!(queue = %self.name, seq = entry.seq, attempts, error = %e, "drain halted");
                    let exhausted = self.policy.max_attempts.is_some_and(|max| attempts >= max);
                    if exhausted {
                        let reason = format!("gave up after {attempts} attempts: {e}");
                        self.dead_letter_head(entry, reason, e.status())?;
                        report.dead_lettered += 1;
                    }
                    report.halted = Some(e);
                    break;
                }
            }
        }

        report.remaining = self.len()?;
        Ok(report)
    }
}

/// Resets the drain flag (and releases the drain lock) when a pass ends,
/// including when the drain future is dropped mid-pass.
struct DrainGuard<'a> {
    flag: &'a AtomicBool,
    _file: Option<File>,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl DurableStore {
    fn with_lock<R>(&self, f: impl FnOnce() -> QueueResult<R>) -> QueueResult<R> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock)?;
        file.lock_exclusive()?;
        let result = f();
        drop(file);
        result
    }

    /// Drop a partial last line left by an interrupted append.
    fn repair_tail(&self) -> QueueResult<()> {
        let bytes = fs::read(&self.log)?;
        if matches!(bytes.last(), None | Some(b'\n')) {
            return Ok(());
        }
        let keep = bytes.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
        let file = OpenOptions::new().write(true).open(&self.log)?;
        file.set_len(keep as u64)?;
        file.sync_all()?;
        Ok(())
    }

    fn read_checkpoint(&self) -> QueueResult<Checkpoint> {
        match fs::read_to_string(&self.checkpoint) {
            Ok(s) if s.trim().is_empty() => Ok(Checkpoint::default()),
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Checkpoint::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_checkpoint(&self, ckpt: &Checkpoint) -> QueueResult<()> {
        let tmp = self.checkpoint.with_extension("checkpoint.tmp");
        fs::write(&tmp, serde_json::to_string(ckpt)?)?;
        fs::rename(&tmp, &self.checkpoint)?;
        Ok(())
    }

    /// Live entries, total records in the log, and the checkpoint.
    fn load<T: DeserializeOwned>(&self) -> QueueResult<(Vec<Entry<T>>, usize, Checkpoint)> {
        let records: Vec<Entry<T>> = jsonl::read_all(&self.log)?;
        let mut ckpt = self.read_checkpoint()?;
        if let Some(last) = records.last() {
            ckpt.next_seq = ckpt.next_seq.max(last.seq + 1);
        }
        let total = records.len();
        let live = records
            .into_iter()
            .filter(|e| e.seq >= ckpt.head_seq)
            .collect();
        Ok((live, total, ckpt))
    }

    /// Mark everything up to `seq` as drained, compacting the log when the
    /// drained prefix is large or the queue is empty.
    fn advance_head<T: Serialize + DeserializeOwned>(&self, seq: u64) -> QueueResult<()> {
        let (live, total, mut ckpt) = self.load::<T>()?;
        if seq < ckpt.head_seq {
            return Ok(());
        }
        ckpt.head_seq = seq + 1;
        if ckpt.head_failures.is_some_and(|f| f.seq <= seq) {
            ckpt.head_failures = None;
        }
        self.write_checkpoint(&ckpt)?;

        let remaining: Vec<&Entry<T>> = live.iter().filter(|e| e.seq > seq).collect();
        if remaining.is_empty() {
            jsonl::write_all::<Entry<T>>(&self.log, &[])?;
        } else if total - remaining.len() >= COMPACT_AFTER {
            jsonl::write_all(&self.log, &remaining)?;
        }
        Ok(())
    }
}
