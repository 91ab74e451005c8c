// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

fn place(address: &str) -> Place {
    Place::new(address, GeoPoint::new(40.7128, -74.0060))
}

fn job() -> JobCreate {
    JobCreate {
        driver_id: "drv-7".into(),
        vehicle_id: "veh-12".into(),
        pickup_location: place("12 Canal St"),
        dropoff_location: place("Impound Lot 4"),
        stops: vec![],
        status: JobStatus::Pending,
    }
}

#[parameterized(
    front = { "front", PhotoKind::Front },
    rear = { "REAR", PhotoKind::Rear },
    side = { "side", PhotoKind::Side },
    damage = { "Damage", PhotoKind::Damage },
)]
fn photo_kind_from_str(input: &str, expected: PhotoKind) {
    assert_eq!(input.parse::<PhotoKind>().unwrap(), expected);
}

#[test]
fn photo_kind_rejects_unknown() {
    assert!(matches!(
        "roof".parse::<PhotoKind>(),
        Err(Error::InvalidPhotoKind(_))
    ));
}

#[test]
fn photo_ref_serializes_kind_as_type() {
    let photo = PhotoRef::new("file:///dcim/1.jpg", PhotoKind::Damage, ts());
    let json = serde_json::to_value(&photo).unwrap();
    assert_eq!(json["type"], "damage");
    assert_eq!(json["uri"], "file:///dcim/1.jpg");
}

#[parameterized(
    in_progress = { "in_progress", JobStatus::InProgress },
    dashed = { "in-progress", JobStatus::InProgress },
    cancelled = { "cancelled", JobStatus::Cancelled },
)]
fn job_status_from_str(input: &str, expected: JobStatus) {
    assert_eq!(input.parse::<JobStatus>().unwrap(), expected);
}

#[parameterized(
    origin = { 0.0, 0.0, true },
    north_pole = { 90.0, 180.0, true },
    lat_too_big = { 90.5, 0.0, false },
    lon_too_small = { 0.0, -180.1, false },
    nan = { f64::NAN, 0.0, false },
)]
fn geo_point_validate(lat: f64, lon: f64, ok: bool) {
    assert_eq!(GeoPoint::new(lat, lon).validate().is_ok(), ok);
}

#[test]
fn location_update_rejects_negative_speed() {
    let update = LocationUpdate {
        latitude: 1.0,
        longitude: 2.0,
        timestamp: ts(),
        speed: -3.0,
    };
    assert!(update.validate().is_err());
}

#[test]
fn location_update_wire_format() {
    let update = LocationUpdate {
        latitude: 1.5,
        longitude: 2.5,
        timestamp: ts(),
        speed: 12.0,
    };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json["latitude"], 1.5);
    assert_eq!(json["speed"], 12.0);
    assert!(json["timestamp"].as_str().unwrap().starts_with("2026-03-14T09:30:00"));
}

#[test]
fn inspection_requires_job_and_type() {
    let mut form = InspectionSubmit {
        job_id: "job-1".into(),
        inspection_type: "pre-trip".into(),
        passed: true,
        details: String::new(),
        tire_pressure: "32psi".into(),
        brakes: "ok".into(),
        lights: "ok".into(),
        date: ts(),
        photos: vec![],
    };
    assert!(form.validate().is_ok());

    form.inspection_type = "  ".into();
    assert!(matches!(
        form.validate(),
        Err(Error::FieldRequired {
            field: "inspection type"
        })
    ));

    form.job_id.clear();
    assert!(matches!(
        form.validate(),
        Err(Error::FieldRequired { field: "job id" })
    ));
}

#[test]
fn inspection_wire_format_is_camel_case() {
    let form = InspectionSubmit {
        job_id: "job-1".into(),
        inspection_type: "post-trip".into(),
        passed: false,
        details: "cracked mirror".into(),
        tire_pressure: String::new(),
        brakes: String::new(),
        lights: String::new(),
        date: ts(),
        photos: vec![],
    };
    let json = serde_json::to_value(&form).unwrap();
    assert_eq!(json["jobId"], "job-1");
    assert_eq!(json["inspectionType"], "post-trip");
    assert!(json.get("tirePressure").is_some());
}

#[parameterized(
    no_driver = { "driver", "driver id" },
    no_vehicle = { "vehicle", "vehicle id" },
    no_pickup = { "pickup", "pickup address" },
    no_dropoff = { "dropoff", "dropoff address" },
)]
fn job_create_required_fields(blank: &str, field: &str) {
    let mut form = job();
    match blank {
        "driver" => form.driver_id.clear(),
        "vehicle" => form.vehicle_id = " ".into(),
        "pickup" => form.pickup_location.address.clear(),
        _ => form.dropoff_location.address.clear(),
    }
    let err = form.validate().unwrap_err();
    assert!(err.to_string().contains(field));
}

#[test]
fn job_create_stop_is_flattened() {
    let mut form = job();
    form.stops.push(Stop {
        order: 0,
        place: place("Body Shop"),
    });
    let json = serde_json::to_value(&form).unwrap();
    let stop = &json["stops"][0];
    assert_eq!(stop["order"], 0);
    assert_eq!(stop["address"], "Body Shop");
    assert_eq!(json["pickupLocation"]["coordinates"]["latitude"], 40.7128);
    assert_eq!(json["status"], "pending");
}

#[test]
fn job_complete_checks_path() {
    let mut form = JobComplete {
        job_id: "job-3".into(),
        tracking_path: vec![TrackPoint {
            latitude: 10.0,
            longitude: 10.0,
            timestamp: ts(),
        }],
        completed_at: ts(),
    };
    assert!(form.validate().is_ok());

    form.tracking_path[0].latitude = 123.0;
    assert!(matches!(
        form.validate(),
        Err(Error::InvalidCoordinates { .. })
    ));
}
