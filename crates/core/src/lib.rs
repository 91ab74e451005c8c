// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! towline-core: Shared types for the towline offline submission layer.
//!
//! This crate provides the operation payloads sent by field devices (VIN
//! scans, location pings, inspections, job creation and completion), the
//! tagged [`Operation`] union that the retry queues carry, and the JSONL
//! helpers used for durable queue storage.

pub mod error;
pub mod jsonl;
pub mod op;
pub mod payload;
pub mod vin;

pub use error::{Error, Result};
pub use op::{OpKind, Operation};
pub use payload::{
    GeoPoint, InspectionSubmit, JobComplete, JobCreate, JobStatus, LocationUpdate, PhotoKind,
    PhotoRef, Place, Stop, TrackPoint, VinScan,
};
pub use vin::Vin;
