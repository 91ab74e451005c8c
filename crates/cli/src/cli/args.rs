// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Value parsers and shared argument structs for CLI commands.

use chrono::Utc;
use clap::Args;
use towline_core::{GeoPoint, PhotoKind, PhotoRef, Place};

use super::OutputFormat;

/// Output format argument shared by read commands.
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Output format (text, json)
    #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Parse a string that must not be empty or whitespace-only.
pub fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.trim().to_string())
    }
}

/// Parse `kind=uri`, stamping the photo with the current time.
pub fn parse_photo(s: &str) -> Result<PhotoRef, String> {
    let (kind, uri) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KIND=URI, got '{s}'"))?;
    let kind: PhotoKind = kind.trim().parse().map_err(|e| format!("{e}"))?;
    let uri = non_empty_string(uri).map_err(|e| format!("photo uri {e}"))?;
    Ok(PhotoRef::new(uri, kind, Utc::now()))
}

/// Parse `lat,lon` into a validated point.
pub fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{s}'"))?;
    let number = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", v.trim()))
    };
    let point = GeoPoint::new(number(lat)?, number(lon)?);
    point.validate().map_err(|e| e.to_string())?;
    Ok(point)
}

/// Parse `address@lat,lon`. The last `@` separates the coordinates, so
/// addresses may contain `@`.
pub fn parse_place(s: &str) -> Result<Place, String> {
    let (address, point) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected ADDRESS@LAT,LON, got '{s}'"))?;
    let address = non_empty_string(address).map_err(|e| format!("address {e}"))?;
    Ok(Place::new(address, parse_point(point)?))
}
