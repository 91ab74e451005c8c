// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request payloads for the fleet API write endpoints.
//!
//! Field names serialize in camelCase to match the API's JSON bodies.
//! Every payload has a `validate` method that runs the same local checks a
//! screen performs before attempting a submission.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vin::Vin;

/// Which side of the vehicle a photo shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    Front,
    Rear,
    Side,
    Damage,
}

impl PhotoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoKind::Front => "front",
            PhotoKind::Rear => "rear",
            PhotoKind::Side => "side",
            PhotoKind::Damage => "damage",
        }
    }
}

impl fmt::Display for PhotoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PhotoKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "front" => Ok(PhotoKind::Front),
            "rear" => Ok(PhotoKind::Rear),
            "side" => Ok(PhotoKind::Side),
            "damage" => Ok(PhotoKind::Damage),
            _ => Err(Error::InvalidPhotoKind(s.to_string())),
        }
    }
}

/// Reference to a photo already captured on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: PhotoKind,
    pub timestamp: DateTime<Utc>,
}

impl PhotoRef {
    pub fn new(uri: impl Into<String>, kind: PhotoKind, timestamp: DateTime<Utc>) -> Self {
        PhotoRef {
            uri: uri.into(),
            kind,
            timestamp,
        }
    }
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Rejects non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(Error::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// A street address with its resolved coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: String,
    pub coordinates: GeoPoint,
}

impl Place {
    pub fn new(address: impl Into<String>, coordinates: GeoPoint) -> Self {
        Place {
            address: address.into(),
            coordinates,
        }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(Error::FieldRequired { field });
        }
        self.coordinates.validate()
    }
}

/// An intermediate stop on a job, ordered by `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub order: u32,
    #[serde(flatten)]
    pub place: Place,
}

/// Lifecycle status of a tow job as understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Assigned => "assigned",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(JobStatus::Pending),
            "assigned" => Ok(JobStatus::Assigned),
            "in_progress" => Ok(JobStatus::InProgress),
            "completed" => Ok(JobStatus::Completed),
            "cancelled" => Ok(JobStatus::Cancelled),
            _ => Err(Error::InvalidJobStatus(s.to_string())),
        }
    }
}

/// Body of `POST /vin/scan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VinScan {
    pub vin: Vin,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
}

/// Body of `POST /tracking/update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    /// Ground speed in meters per second.
    #[serde(default)]
    pub speed: f64,
}

impl LocationUpdate {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn validate(&self) -> Result<()> {
        self.point().validate()?;
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(Error::InvalidInput(format!(
                "invalid speed: {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Body of `POST /inspections/submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSubmit {
    pub job_id: String,
    pub inspection_type: String,
    pub passed: bool,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub tire_pressure: String,
    #[serde(default)]
    pub brakes: String,
    #[serde(default)]
    pub lights: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
}

impl InspectionSubmit {
    pub fn validate(&self) -> Result<()> {
        if self.job_id.trim().is_empty() {
            return Err(Error::FieldRequired { field: "job id" });
        }
        if self.inspection_type.trim().is_empty() {
            return Err(Error::FieldRequired {
                field: "inspection type",
            });
        }
        Ok(())
    }
}

/// Body of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreate {
    pub driver_id: String,
    pub vehicle_id: String,
    pub pickup_location: Place,
    pub dropoff_location: Place,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub status: JobStatus,
}

impl JobCreate {
    pub fn validate(&self) -> Result<()> {
        if self.driver_id.trim().is_empty() {
            return Err(Error::FieldRequired { field: "driver id" });
        }
        if self.vehicle_id.trim().is_empty() {
            return Err(Error::FieldRequired { field: "vehicle id" });
        }
        self.pickup_location.validate("pickup address")?;
        self.dropoff_location.validate("dropoff address")?;
        for stop in &self.stops {
            stop.place.validate("stop address")?;
        }
        Ok(())
    }
}

/// One sample of the path driven during a job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&LocationUpdate> for TrackPoint {
    fn from(update: &LocationUpdate) -> Self {
        TrackPoint {
            latitude: update.latitude,
            longitude: update.longitude,
            timestamp: update.timestamp,
        }
    }
}

/// Body of `POST /jobs/complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobComplete {
    pub job_id: String,
    #[serde(default)]
    pub tracking_path: Vec<TrackPoint>,
    pub completed_at: DateTime<Utc>,
}

impl JobComplete {
    pub fn validate(&self) -> Result<()> {
        if self.job_id.trim().is_empty() {
            return Err(Error::FieldRequired { field: "job id" });
        }
        for point in &self.tracking_path {
            GeoPoint::new(point.latitude, point.longitude).validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
