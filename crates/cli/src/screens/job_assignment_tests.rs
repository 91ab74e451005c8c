// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::screens::testing::Harness;
use crate::sync::SubmitError;
use serde_json::json;
use towline_core::{GeoPoint, JobStatus, Place, Stop};
use yare::parameterized;

fn place(address: &str) -> Place {
    Place::new(address, GeoPoint::new(32.71, -117.16))
}

fn stop(order: u32, address: &str) -> Stop {
    Stop {
        order,
        place: place(address),
    }
}

fn form() -> JobCreate {
    JobCreate {
        driver_id: "drv-1".into(),
        vehicle_id: "veh-9".into(),
        pickup_location: place("100 Harbor Dr"),
        dropoff_location: place("5 Yard Rd"),
        stops: vec![],
        status: JobStatus::Assigned,
    }
}

#[test]
fn stops_are_sorted_and_renumbered_from_one() {
    let mut job = form();
    job.stops = vec![stop(30, "c"), stop(10, "a"), stop(20, "b"), stop(10, "a2")];

    renumber_stops(&mut job);

    let stops: Vec<(u32, &str)> = job
        .stops
        .iter()
        .map(|s| (s.order, s.place.address.as_str()))
        .collect();
    assert_eq!(stops, vec![(1, "a"), (2, "a2"), (3, "b"), (4, "c")]);
}

#[parameterized(
    driver = { |f: &mut JobCreate| f.driver_id = " ".into(), "driver id" },
    vehicle = { |f: &mut JobCreate| f.vehicle_id.clear(), "vehicle id" },
    pickup = { |f: &mut JobCreate| f.pickup_location.address.clear(), "pickup address" },
    dropoff = { |f: &mut JobCreate| f.dropoff_location.address.clear(), "dropoff address" },
    stop_address = { |f: &mut JobCreate| f.stops.push(stop(1, "")), "stop address" },
)]
fn incomplete_job_is_rejected(edit: fn(&mut JobCreate), expected: &str) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let harness = Harness::new(true);
        let screen = JobAssignment::new(&harness.ctx).unwrap();
        let mut job = form();
        edit(&mut job);

        let outcome = screen.create_job(job).await.unwrap();

        match outcome {
            Outcome::Rejected(towline_core::Error::FieldRequired { field }) => {
                assert_eq!(field, expected)
            }
            other => unreachable!("expected rejection, got {other:?}"),
        }
        assert_eq!(harness.transport.request_count(), 0);
    });
}

#[tokio::test]
async fn bad_pickup_coordinates_are_rejected() {
    let harness = Harness::new(true);
    let screen = JobAssignment::new(&harness.ctx).unwrap();
    let mut job = form();
    job.pickup_location.coordinates = GeoPoint::new(120.0, 0.0);

    let outcome = screen.create_job(job).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Rejected(towline_core::Error::InvalidCoordinates { .. })
    ));
}

#[tokio::test]
async fn job_is_posted_with_renumbered_stops() {
    let harness = Harness::new(true);
    harness.transport.respond_json(201, json!({"id": "job-42"}));
    let screen = JobAssignment::new(&harness.ctx).unwrap();
    let mut job = form();
    job.stops = vec![stop(5, "second"), stop(2, "first")];

    let outcome = screen.create_job(job).await.unwrap();

    match outcome {
        Outcome::Submitted { response } => assert_eq!(response.unwrap()["id"], "job-42"),
        other => unreachable!("expected submission, got {other:?}"),
    }
    let request = &harness.transport.requests()[0];
    assert_eq!(request.path, "/jobs");
    let body = request.body.as_ref().unwrap();
    assert_eq!(body["driverId"], "drv-1");
    assert_eq!(body["status"], "assigned");
    assert_eq!(body["pickupLocation"]["address"], "100 Harbor Dr");
    assert_eq!(body["stops"][0]["order"], 1);
    assert_eq!(body["stops"][0]["address"], "first");
    assert_eq!(body["stops"][1]["order"], 2);
}

#[tokio::test]
async fn duplicate_job_is_dead_lettered() {
    let harness = Harness::new(true);
    harness
        .transport
        .respond_json(409, json!({"error": "duplicate job"}));
    let screen = JobAssignment::new(&harness.ctx).unwrap();

    let outcome = screen.create_job(form()).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::DeadLettered {
            error: SubmitError::Server { status: 409, .. }
        }
    ));
    assert_eq!(screen.flow().pending().unwrap(), 0);
    assert_eq!(screen.flow().queue().dead_letters().unwrap().len(), 1);
}

#[tokio::test]
async fn lists_drivers_and_vehicles() {
    let harness = Harness::new(true);
    harness
        .transport
        .respond_json(200, json!([{"id": "drv-1"}, {"id": "drv-2"}]));
    harness
        .transport
        .respond_json(200, json!({"data": [{"id": "veh-9"}]}));
    let screen = JobAssignment::new(&harness.ctx).unwrap();

    let drivers = screen.drivers().await.unwrap();
    let vehicles = screen.vehicles().await.unwrap();

    assert_eq!(drivers.len(), 2);
    assert_eq!(vehicles[0]["id"], "veh-9");
    let paths: Vec<String> = harness
        .transport
        .requests()
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(paths, vec!["/drivers", "/fleet/vehicles"]);
}
