// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use crate::colors;
use crate::help;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use towline_core::{GeoPoint, JobStatus, PhotoRef, Place};

pub use args::{non_empty_string, parse_photo, parse_place, parse_point, OutputArgs};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "towline")]
#[command(version)]
#[command(about = "Offline-first submission queue for tow-fleet field devices")]
#[command(
    long_about = "Offline-first submission queue for tow-fleet field devices.\n\n\
    Records VIN scans, location updates, inspections and job assignments, sending them \
    to the fleet API when it is reachable and queueing them on disk when it is not."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(flatten)]
    Fleet(FleetCommand),

    /// Store the device token
    Login {
        /// Bearer token issued for this device
        #[arg(long, value_parser = non_empty_string)]
        token: String,
    },

    /// Remove the stored device token
    Logout,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Commands that run against the device's fleet state.
#[derive(Subcommand)]
pub enum FleetCommand {
    // ─────────────────────────────────────────────────────────────────────────
    // Record
    // ─────────────────────────────────────────────────────────────────────────
    /// Record a VIN scan
    #[command(after_help = colors::examples("\
Examples:
  towline scan 1HGCM82633A004352                            Scan without photos
  towline scan 1HGCM82633A004352 --photo front=file:///p/1.jpg   Attach a photo"))]
    Scan {
        /// The scanned barcode (17 characters)
        vin: String,

        /// Attach a photo as KIND=URI (front, rear, side, damage)
        #[arg(long = "photo", value_name = "KIND=URI", value_parser = parse_photo)]
        photos: Vec<PhotoRef>,
    },

    /// Record a location update for the active job
    Track {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Ground speed in meters per second
        #[arg(long, default_value_t = 0.0)]
        speed: f64,
    },

    /// Complete a job with its tracking path
    #[command(after_help = colors::examples("\
Examples:
  towline complete job-17                                     Complete without a path
  towline complete job-17 --point 32.71,-117.16 --point 32.72,-117.15   With a path"))]
    Complete {
        /// Job ID
        #[arg(value_parser = non_empty_string)]
        job_id: String,

        /// Tracking path point as LAT,LON (repeat in driving order)
        #[arg(long = "point", value_name = "LAT,LON", value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<GeoPoint>,
    },

    /// Submit a vehicle inspection
    #[command(group(ArgGroup::new("result").required(true).args(["passed", "failed"])))]
    Inspect {
        /// Job ID
        #[arg(long = "job", value_parser = non_empty_string)]
        job_id: String,

        /// Inspection type (e.g. pre_trip, post_trip)
        #[arg(long = "type", value_parser = non_empty_string)]
        inspection_type: String,

        /// The vehicle passed
        #[arg(long)]
        passed: bool,

        /// The vehicle failed
        #[arg(long)]
        failed: bool,

        /// Free-form notes
        #[arg(long, default_value = "")]
        details: String,

        #[arg(long, default_value = "")]
        tire_pressure: String,

        #[arg(long, default_value = "")]
        brakes: String,

        #[arg(long, default_value = "")]
        lights: String,

        /// Attach a photo as KIND=URI (front, rear, side, damage)
        #[arg(long = "photo", value_name = "KIND=URI", value_parser = parse_photo)]
        photos: Vec<PhotoRef>,
    },

    /// Create and assign a job
    #[command(after_help = colors::examples("\
Examples:
  towline assign --driver drv-1 --vehicle veh-9 \\
    --pickup \"100 Harbor Dr@32.71,-117.17\" --dropoff \"5 Yard Rd@32.80,-117.10\"
  towline assign ... --stop \"Gas station@32.75,-117.12\"   Add a stop (in order)"))]
    Assign {
        /// Driver ID
        #[arg(long, value_parser = non_empty_string)]
        driver: String,

        /// Vehicle ID
        #[arg(long, value_parser = non_empty_string)]
        vehicle: String,

        /// Pickup as ADDRESS@LAT,LON
        #[arg(long, value_name = "ADDRESS@LAT,LON", value_parser = parse_place)]
        pickup: Place,

        /// Dropoff as ADDRESS@LAT,LON
        #[arg(long, value_name = "ADDRESS@LAT,LON", value_parser = parse_place)]
        dropoff: Place,

        /// Intermediate stop as ADDRESS@LAT,LON (repeat in visiting order)
        #[arg(long = "stop", value_name = "ADDRESS@LAT,LON", value_parser = parse_place)]
        stops: Vec<Place>,

        /// Initial job status
        #[arg(long, default_value = "assigned")]
        status: JobStatus,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Sync
    // ─────────────────────────────────────────────────────────────────────────
    /// Show queued and dead-lettered operations per screen
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Send queued operations now, if the API is reachable
    Drain,

    /// Drain whenever the API becomes reachable, until interrupted
    Watch,

    // ─────────────────────────────────────────────────────────────────────────
    // Session & fleet
    // ─────────────────────────────────────────────────────────────────────────
    /// Check the session against the API
    Verify,

    /// List drivers
    Drivers {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List vehicles
    Vehicles {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
