// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Job assignment screen (dispatcher side).

use serde_json::Value;
use towline_core::JobCreate;

use super::{OfflineFirst, Outcome, ScreenContext};
use crate::error::Result;
use crate::sync::{HttpTransport, Transport};

/// Queue holding unsent job creations.
pub const QUEUE: &str = "job_assignment";

/// Assigns new jobs to a driver and vehicle.
pub struct JobAssignment<Tr: Transport = HttpTransport> {
    flow: OfflineFirst<Tr>,
}

impl<Tr: Transport + 'static> JobAssignment<Tr> {
    pub fn new(ctx: &ScreenContext<Tr>) -> Result<Self> {
        Ok(JobAssignment {
            flow: OfflineFirst::new(ctx, QUEUE)?,
        })
    }

    pub fn flow(&self) -> &OfflineFirst<Tr> {
        &self.flow
    }

    /// Create a job.
    ///
    /// Stops are sorted by their order index (ties keep their input order)
    /// and renumbered from 1.
    pub async fn create_job(&self, mut form: JobCreate) -> Result<Outcome> {
        form.driver_id = form.driver_id.trim().to_string();
        form.vehicle_id = form.vehicle_id.trim().to_string();
        renumber_stops(&mut form);
        self.flow.submit(form.into()).await
    }

    /// Drivers available for assignment.
    pub async fn drivers(&self) -> Result<Vec<Value>> {
        Ok(self.flow.client().list_drivers().await?)
    }

    /// Vehicles available for assignment.
    pub async fn vehicles(&self) -> Result<Vec<Value>> {
        Ok(self.flow.client().list_vehicles().await?)
    }
}

fn renumber_stops(form: &mut JobCreate) {
    form.stops.sort_by_key(|stop| stop.order);
    for (i, stop) in form.stops.iter_mut().enumerate() {
        stop.order = i as u32 + 1;
    }
}

#[cfg(test)]
#[path = "job_assignment_tests.rs"]
mod tests;
