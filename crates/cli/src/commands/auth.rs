// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session commands: store, remove and verify the device token.

use std::io::Write;
use std::path::Path;

use crate::auth::TokenFile;
use crate::config;
use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::sync::{SubmitError, Transport};

pub fn login(state_dir: &Path, token: &str, out: &mut impl Write) -> Result<()> {
    let file = TokenFile::new(config::token_path(state_dir));
    file.store(token)?;
    tracing::info!(path = %file.path().display(), "token stored");
    writeln!(out, "logged in; token stored at {}", file.path().display())?;
    Ok(())
}

pub fn logout(state_dir: &Path, out: &mut impl Write) -> Result<()> {
    let file = TokenFile::new(config::token_path(state_dir));
    if file.clear()? {
        writeln!(out, "logged out")?;
    } else {
        writeln!(out, "not logged in")?;
    }
    Ok(())
}

/// Check the session once against `/auth/verify`.
pub async fn verify<Tr: Transport + 'static>(fleet: &Fleet<Tr>, out: &mut impl Write) -> Result<()> {
    match fleet.client().verify_session().await {
        Ok(body) => {
            writeln!(out, "session valid")?;
            if let Some(user) = body.get("user").or_else(|| body.get("email")) {
                let user = user.as_str().map_or_else(|| user.to_string(), str::to_string);
                writeln!(out, "user: {user}")?;
            }
            Ok(())
        }
        Err(SubmitError::MissingCredential) => Err(Error::NotLoggedIn),
        Err(SubmitError::Network(_)) => Err(Error::Offline),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
