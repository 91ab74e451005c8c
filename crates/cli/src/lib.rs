// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! towline - offline-first submission queues for tow-fleet field devices.
//!
//! This crate provides the `towline` CLI and the library behind it. Each
//! screen of the field app (VIN scanner, job tracker, inspection, job
//! assignment) submits operations to the fleet API and buffers them in its
//! own retry queue while the device is offline.
//!
//! # Main Components
//!
//! - [`Fleet`] - The four screens wired to one client, monitor and event bus
//! - [`screens`] - Screen controllers built on [`screens::OfflineFirst`]
//! - [`sync`] - Retry queues, the drainer, connectivity and the HTTP client
//! - [`Config`] - Device configuration (API URL, queue policy, backoff)
//! - [`Error`] - Error types for all operations
//!
//! ```rust,ignore
//! use towline::Fleet;
//!
//! let fleet = Fleet::open()?;
//! let outcome = fleet.vin_scanner.scan("1HGCM82633A004352", vec![]).await?;
//! ```

pub mod auth;
mod cli;
pub mod colors;
mod commands;
pub mod config;
mod env;
pub mod error;
pub mod fleet;
pub mod help;
pub mod logging;
pub mod screens;
pub mod sync;

pub use cli::{Cli, Command, FleetCommand, OutputArgs, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};
pub use fleet::Fleet;

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use clap::CommandFactory;
use clap_complete::generate;
use towline_core::{InspectionSubmit, JobCreate, Stop};

/// Execute a parsed command line. This is the main entry point for the
/// binary and provides a testable way to run commands without process
/// execution.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = config::state_dir()?;
    let log_file = matches!(cli.command, Command::Fleet(FleetCommand::Watch))
        .then(|| config::log_path(&state_dir));
    logging::init(cli.verbose, log_file.as_deref());

    let mut stdout = std::io::stdout();
    match cli.command {
        Command::Login { token } => commands::auth::login(&state_dir, &token, &mut stdout),
        Command::Logout => commands::auth::logout(&state_dir, &mut stdout),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "towline", &mut stdout);
            Ok(())
        }
        Command::Fleet(command) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(dispatch(command, &state_dir, &mut stdout))
        }
    }
}

async fn dispatch(command: FleetCommand, state_dir: &Path, out: &mut impl Write) -> Result<()> {
    let fleet = Fleet::open_at(state_dir)?;
    match command {
        FleetCommand::Scan { vin, photos } => commands::record::scan(&fleet, &vin, photos, out).await,
        FleetCommand::Track { lat, lon, speed } => {
            commands::record::track(&fleet, lat, lon, speed, out).await
        }
        FleetCommand::Complete { job_id, points } => {
            commands::record::complete(&fleet, &job_id, points, out).await
        }
        FleetCommand::Inspect {
            job_id,
            inspection_type,
            passed,
            failed: _,
            details,
            tire_pressure,
            brakes,
            lights,
            photos,
        } => {
            let form = InspectionSubmit {
                job_id,
                inspection_type,
                passed,
                details,
                tire_pressure,
                brakes,
                lights,
                date: Utc::now(),
                photos,
            };
            commands::record::inspect(&fleet, form, out).await
        }
        FleetCommand::Assign {
            driver,
            vehicle,
            pickup,
            dropoff,
            stops,
            status,
        } => {
            let form = JobCreate {
                driver_id: driver,
                vehicle_id: vehicle,
                pickup_location: pickup,
                dropoff_location: dropoff,
                stops: stops
                    .into_iter()
                    .zip(1..)
                    .map(|(place, order)| Stop { order, place })
                    .collect(),
                status,
            };
            commands::record::assign(&fleet, form, out).await
        }
        FleetCommand::Status { output } => commands::status::run(&fleet, output.output, out),
        FleetCommand::Drain => commands::drain::run(&fleet, out).await,
        FleetCommand::Watch => {
            let interval = fleet.config().connectivity.probe_interval();
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "could not listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            };
            commands::watch::run(&fleet, interval, shutdown, out).await
        }
        FleetCommand::Verify => commands::auth::verify(&fleet, out).await,
        FleetCommand::Drivers { output } => commands::lists::drivers(&fleet, output.output, out).await,
        FleetCommand::Vehicles { output } => commands::lists::vehicles(&fleet, output.output, out).await,
    }
}
