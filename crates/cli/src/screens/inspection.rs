// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Vehicle inspection screen.

use towline_core::InspectionSubmit;

use super::{OfflineFirst, Outcome, ScreenContext};
use crate::error::Result;
use crate::sync::{HttpTransport, Transport};

/// Queue holding unsent inspections.
pub const QUEUE: &str = "inspection";

pub struct Inspection<Tr: Transport = HttpTransport> {
    flow: OfflineFirst<Tr>,
}

impl<Tr: Transport + 'static> Inspection<Tr> {
    pub fn new(ctx: &ScreenContext<Tr>) -> Result<Self> {
        Ok(Inspection {
            flow: OfflineFirst::new(ctx, QUEUE)?,
        })
    }

    pub fn flow(&self) -> &OfflineFirst<Tr> {
        &self.flow
    }

    /// Submit a completed inspection form.
    pub async fn submit(&self, mut form: InspectionSubmit) -> Result<Outcome> {
        form.job_id = form.job_id.trim().to_string();
        form.inspection_type = form.inspection_type.trim().to_string();
        self.flow.submit(form.into()).await
    }
}

#[cfg(test)]
#[path = "inspection_tests.rs"]
mod tests;
