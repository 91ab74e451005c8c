// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Vehicle Identification Numbers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Required VIN length in characters.
pub const VIN_LEN: usize = 17;

/// A scanned Vehicle Identification Number.
///
/// The only check is length: any 17-character barcode value is accepted
/// as-is, anything else is rejected. Character set and check digit are left
/// to the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Vin(String);

impl Vin {
    /// Validates a raw barcode value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVin`] unless the value is exactly 17 characters.
    pub fn parse(raw: &str) -> Result<Self> {
        let len = raw.chars().count();
        if len != VIN_LEN {
            return Err(Error::InvalidVin { len });
        }
        Ok(Vin(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Vin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Vin::parse(s)
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Vin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Vin::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "vin_tests.rs"]
mod tests;
