// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! VIN scanner screen.

use towline_core::{PhotoRef, Vin, VinScan};

use super::{OfflineFirst, Outcome, ScreenContext};
use crate::error::Result;
use crate::sync::{HttpTransport, Transport};

/// Queue holding unsent VIN scans.
pub const QUEUE: &str = "vin_scanner";

/// Records scanned VINs with their photos.
pub struct VinScanner<Tr: Transport = HttpTransport> {
    flow: OfflineFirst<Tr>,
}

impl<Tr: Transport + 'static> VinScanner<Tr> {
    pub fn new(ctx: &ScreenContext<Tr>) -> Result<Self> {
        Ok(VinScanner {
            flow: OfflineFirst::new(ctx, QUEUE)?,
        })
    }

    pub fn flow(&self) -> &OfflineFirst<Tr> {
        &self.flow
    }

    /// Submit a scanned barcode.
    ///
    /// A barcode that is not exactly 17 characters is rejected before it
    /// can reach the queue or the API.
    pub async fn scan(&self, barcode: &str, photos: Vec<PhotoRef>) -> Result<Outcome> {
        let vin = match Vin::parse(barcode) {
            Ok(vin) => vin,
            Err(e) => return Ok(Outcome::Rejected(e)),
        };
        self.flow.submit(VinScan { vin, photos }.into()).await
    }
}

#[cfg(test)]
#[path = "vin_scanner_tests.rs"]
mod tests;
