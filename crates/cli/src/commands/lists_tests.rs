// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestFleet;
use serde_json::json;
use yare::parameterized;

#[parameterized(
    string_id_with_name = { json!({"id": "drv-1", "name": "Ana"}), "drv-1  Ana" },
    numeric_id = { json!({"id": 7, "email": "a@b.test"}), "7  a@b.test" },
    first_label_wins = { json!({"id": "x", "name": "N", "email": "e"}), "x  N" },
    no_label = { json!({"id": "x"}), "x" },
    no_id = { json!({"name": "N"}), "-  N" },
)]
fn driver_lines(item: Value, expected: &str) {
    assert_eq!(text_line(&item, &["name", "email"]), expected);
}

#[tokio::test]
async fn drivers_text() {
    let ctx = TestFleet::new(true);
    ctx.transport.respond_json(
        200,
        json!([{"id": "drv-1", "name": "Ana"}, {"id": "drv-2", "name": "Bo"}]),
    );
    let mut out = Vec::new();

    drivers(&ctx.fleet, OutputFormat::Text, &mut out)
        .await
        .unwrap();

    assert_eq!(ctx.output(&out), "drv-1  Ana\ndrv-2  Bo\n");
}

#[tokio::test]
async fn vehicles_json() {
    let ctx = TestFleet::new(true);
    ctx.transport
        .respond_json(200, json!({"data": [{"id": "veh-9", "plate": "7ABC123"}]}));
    let mut out = Vec::new();

    vehicles(&ctx.fleet, OutputFormat::Json, &mut out)
        .await
        .unwrap();

    let value: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value, json!([{"id": "veh-9", "plate": "7ABC123"}]));
    assert_eq!(ctx.transport.requests()[0].path, "/fleet/vehicles");
}
