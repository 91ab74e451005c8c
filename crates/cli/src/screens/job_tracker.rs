// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Job tracker screen.
//!
//! Location pings and the final job completion share one queue, so a
//! completion is never submitted ahead of the pings recorded before it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use towline_core::{JobComplete, LocationUpdate, TrackPoint};

use super::{OfflineFirst, Outcome, ScreenContext};
use crate::error::Result;
use crate::sync::{HttpTransport, Transport};

/// Queue holding unsent location updates and job completions.
pub const QUEUE: &str = "job_tracker";

/// Streams location updates for an active job and completes it.
pub struct JobTracker<Tr: Transport = HttpTransport> {
    flow: OfflineFirst<Tr>,
    path: Mutex<Vec<TrackPoint>>,
}

impl<Tr: Transport + 'static> JobTracker<Tr> {
    pub fn new(ctx: &ScreenContext<Tr>) -> Result<Self> {
        Ok(JobTracker {
            flow: OfflineFirst::new(ctx, QUEUE)?,
            path: Mutex::new(Vec::new()),
        })
    }

    pub fn flow(&self) -> &OfflineFirst<Tr> {
        &self.flow
    }

    fn path(&self) -> MutexGuard<'_, Vec<TrackPoint>> {
        self.path.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Points recorded since the last completed job.
    pub fn tracking_path(&self) -> Vec<TrackPoint> {
        self.path().clone()
    }

    /// Add points recorded elsewhere (without submitting them).
    pub fn extend_path(&self, points: impl IntoIterator<Item = TrackPoint>) {
        self.path().extend(points);
    }

    /// Record the current position.
    pub async fn record_location(&self, latitude: f64, longitude: f64, speed: f64) -> Result<Outcome> {
        self.record_location_at(latitude, longitude, speed, Utc::now())
            .await
    }

    /// Record a position observed at `timestamp`.
    pub async fn record_location_at(
        &self,
        latitude: f64,
        longitude: f64,
        speed: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Outcome> {
        let update = LocationUpdate {
            latitude,
            longitude,
            timestamp,
            speed,
        };
        if let Err(e) = update.validate() {
            return Ok(Outcome::Rejected(e));
        }
        self.path().push(TrackPoint::from(&update));
        self.flow.submit(update.into()).await
    }

    /// Complete `job_id` with the path recorded so far.
    ///
    /// The path is cleared unless the completion is rejected locally.
    pub async fn complete_job(&self, job_id: &str) -> Result<Outcome> {
        let completion = JobComplete {
            job_id: job_id.trim().to_string(),
            tracking_path: self.tracking_path(),
            completed_at: Utc::now(),
        };
        let outcome = self.flow.submit(completion.into()).await?;
        if !matches!(outcome, Outcome::Rejected(_)) {
            self.path().clear();
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "job_tracker_tests.rs"]
mod tests;
