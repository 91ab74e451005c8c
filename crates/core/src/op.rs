// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operations awaiting acknowledgement by the fleet API.
//!
//! Every write a field device performs is represented as an [`Operation`].
//! Operations are designed to be:
//!
//! - Serializable: they are persisted in retry queues and sent as JSON
//! - Immutable: once built, only their queue membership changes
//! - Self-routing: each kind knows the endpoint it is posted to

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::payload::{InspectionSubmit, JobComplete, JobCreate, LocationUpdate, VinScan};

/// Discriminant of an [`Operation`], used for routing, logging and queue names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    VinScan,
    LocationUpdate,
    InspectionSubmit,
    JobCreate,
    JobComplete,
}

impl OpKind {
    /// All kinds, in display order.
    pub const ALL: [OpKind; 5] = [
        OpKind::VinScan,
        OpKind::LocationUpdate,
        OpKind::InspectionSubmit,
        OpKind::JobCreate,
        OpKind::JobComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::VinScan => "vin_scan",
            OpKind::LocationUpdate => "location_update",
            OpKind::InspectionSubmit => "inspection_submit",
            OpKind::JobCreate => "job_create",
            OpKind::JobComplete => "job_complete",
        }
    }

    /// API path this kind is posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            OpKind::VinScan => "/vin/scan",
            OpKind::LocationUpdate => "/tracking/update",
            OpKind::InspectionSubmit => "/inspections/submit",
            OpKind::JobCreate => "/jobs",
            OpKind::JobComplete => "/jobs/complete",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-initiated write, buffered until the API acknowledges it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Operation {
    VinScan(VinScan),
    LocationUpdate(LocationUpdate),
    InspectionSubmit(InspectionSubmit),
    JobCreate(JobCreate),
    JobComplete(JobComplete),
}

impl Operation {
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::VinScan(_) => OpKind::VinScan,
            Operation::LocationUpdate(_) => OpKind::LocationUpdate,
            Operation::InspectionSubmit(_) => OpKind::InspectionSubmit,
            Operation::JobCreate(_) => OpKind::JobCreate,
            Operation::JobComplete(_) => OpKind::JobComplete,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.kind().endpoint()
    }

    /// Runs the local pre-submission checks for this operation.
    ///
    /// VIN scans are validated when the [`Vin`](crate::Vin) is parsed.
    pub fn validate(&self) -> Result<()> {
        match self {
            Operation::VinScan(_) => Ok(()),
            Operation::LocationUpdate(p) => p.validate(),
            Operation::InspectionSubmit(p) => p.validate(),
            Operation::JobCreate(p) => p.validate(),
            Operation::JobComplete(p) => p.validate(),
        }
    }

    /// JSON request body for the operation's endpoint.
    pub fn body(&self) -> Result<serde_json::Value> {
        let value = match self {
            Operation::VinScan(p) => serde_json::to_value(p)?,
            Operation::LocationUpdate(p) => serde_json::to_value(p)?,
            Operation::InspectionSubmit(p) => serde_json::to_value(p)?,
            Operation::JobCreate(p) => serde_json::to_value(p)?,
            Operation::JobComplete(p) => serde_json::to_value(p)?,
        };
        Ok(value)
    }
}

impl From<VinScan> for Operation {
    fn from(p: VinScan) -> Self {
        Operation::VinScan(p)
    }
}

impl From<LocationUpdate> for Operation {
    fn from(p: LocationUpdate) -> Self {
        Operation::LocationUpdate(p)
    }
}

impl From<InspectionSubmit> for Operation {
    fn from(p: InspectionSubmit) -> Self {
        Operation::InspectionSubmit(p)
    }
}

impl From<JobCreate> for Operation {
    fn from(p: JobCreate) -> Self {
        Operation::JobCreate(p)
    }
}

impl From<JobComplete> for Operation {
    fn from(p: JobComplete) -> Self {
        Operation::JobComplete(p)
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
