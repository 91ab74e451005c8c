// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Commands that record an operation through a screen.

use std::io::Write;

use chrono::Utc;
use towline_core::{GeoPoint, InspectionSubmit, JobCreate, PhotoRef, TrackPoint};

use super::report;
use crate::error::Result;
use crate::fleet::Fleet;
use crate::sync::Transport;

pub async fn scan<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    vin: &str,
    photos: Vec<PhotoRef>,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = fleet.vin_scanner.scan(vin, photos).await?;
    report(&format!("VIN scan {}", vin.trim()), outcome, out)
}

pub async fn track<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    latitude: f64,
    longitude: f64,
    speed: f64,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = fleet
        .job_tracker
        .record_location(latitude, longitude, speed)
        .await?;
    report(&format!("location {latitude},{longitude}"), outcome, out)
}

/// Complete `job_id`; `points` become the tracking path, stamped now.
pub async fn complete<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    job_id: &str,
    points: Vec<GeoPoint>,
    out: &mut impl Write,
) -> Result<()> {
    let now = Utc::now();
    fleet.job_tracker.extend_path(points.into_iter().map(|p| TrackPoint {
        latitude: p.latitude,
        longitude: p.longitude,
        timestamp: now,
    }));
    let outcome = fleet.job_tracker.complete_job(job_id).await?;
    report(&format!("completion of {job_id}"), outcome, out)
}

pub async fn inspect<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    form: InspectionSubmit,
    out: &mut impl Write,
) -> Result<()> {
    let what = format!("{} inspection for {}", form.inspection_type, form.job_id);
    let outcome = fleet.inspection.submit(form).await?;
    report(&what, outcome, out)
}

pub async fn assign<Tr: Transport + 'static>(
    fleet: &Fleet<Tr>,
    form: JobCreate,
    out: &mut impl Write,
) -> Result<()> {
    let what = format!("job for driver {}", form.driver_id);
    let outcome = fleet.job_assignment.create_job(form).await?;
    report(&what, outcome, out)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
