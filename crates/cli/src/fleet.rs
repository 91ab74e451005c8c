// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime wiring for a field device.
//!
//! A [`Fleet`] owns one connectivity monitor, one submission client and
//! the four screens, all built from the device configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::auth::{CredentialProvider, StaticToken, TokenFile};
use crate::config::{self, Config};
use crate::env;
use crate::error::Result;
use crate::screens::{
    Inspection, JobAssignment, JobTracker, OfflineFirst, ScreenContext, VinScanner,
};
use crate::sync::{
    ConnectivityMonitor, EventBus, HttpTransport, SubmissionClient, TcpProbe, Transport,
};

/// Credential source for `state_dir`: `TOWLINE_TOKEN` wins over the token
/// file.
pub fn credentials(state_dir: &Path) -> Arc<dyn CredentialProvider> {
    select_credentials(env::token(), state_dir)
}

fn select_credentials(env_token: Option<String>, state_dir: &Path) -> Arc<dyn CredentialProvider> {
    match env_token {
        Some(token) => Arc::new(StaticToken::new(token)),
        None => Arc::new(TokenFile::new(config::token_path(state_dir))),
    }
}

/// Screen context configured from `config`.
pub fn screen_context<Tr: Transport>(
    config: &Config,
    state_dir: &Path,
    client: Arc<SubmissionClient<Tr>>,
    monitor: ConnectivityMonitor,
) -> ScreenContext<Tr> {
    let mut ctx = ScreenContext::new(client, monitor);
    if config.queue.persist {
        ctx.queue_dir = Some(config::queue_dir(state_dir));
    }
    ctx.policy = config.queue.drain_policy();
    ctx.initial_delay = config.retry.initial_delay();
    ctx.max_delay = config.retry.max_delay();
    ctx
}

/// Everything a command needs to record and drain operations.
pub struct Fleet<Tr: Transport = HttpTransport> {
    config: Config,
    state_dir: PathBuf,
    ctx: ScreenContext<Tr>,
    pub vin_scanner: VinScanner<Tr>,
    pub job_tracker: JobTracker<Tr>,
    pub inspection: Inspection<Tr>,
    pub job_assignment: JobAssignment<Tr>,
}

impl Fleet<HttpTransport> {
    /// Open the device state in the default state directory.
    pub fn open() -> Result<Self> {
        Self::open_at(&config::state_dir()?)
    }

    /// Open the device state in `state_dir`, applying `TOWLINE_API_URL`.
    pub fn open_at(state_dir: &Path) -> Result<Self> {
        let config = Config::load(state_dir)?.with_api_url(env::api_url());
        Self::from_config(config, state_dir)
    }

    /// Build the device state for `config` without consulting the
    /// environment for the API URL.
    pub fn from_config(config: Config, state_dir: &Path) -> Result<Self> {
        config.validate()?;

        let client = SubmissionClient::new(
            &config.api.base_url,
            config.api.timeout(),
            credentials(state_dir),
        )?;
        let probe = TcpProbe::from_url(&config.api.base_url, config.connectivity.probe_timeout())?;
        tracing::debug!(api = %config.api.base_url, probe = %probe.addr(), "fleet opened");
        let monitor = ConnectivityMonitor::new(Arc::new(probe));

        let ctx = screen_context(&config, state_dir, Arc::new(client), monitor);
        Fleet::with_context(config, state_dir.to_path_buf(), ctx)
    }
}

impl<Tr: Transport + 'static> Fleet<Tr> {
    /// Build the screens on top of an existing context.
    pub fn with_context(config: Config, state_dir: PathBuf, ctx: ScreenContext<Tr>) -> Result<Self> {
        Ok(Fleet {
            vin_scanner: VinScanner::new(&ctx)?,
            job_tracker: JobTracker::new(&ctx)?,
            inspection: Inspection::new(&ctx)?,
            job_assignment: JobAssignment::new(&ctx)?,
            config,
            state_dir,
            ctx,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.ctx.monitor
    }

    pub fn client(&self) -> &Arc<SubmissionClient<Tr>> {
        &self.ctx.client
    }

    pub fn events(&self) -> &EventBus {
        &self.ctx.events
    }

    /// Every screen's flow, in [`QUEUE_NAMES`](crate::screens::QUEUE_NAMES)
    /// order.
    pub fn flows(&self) -> [&OfflineFirst<Tr>; 4] {
        [
            self.vin_scanner.flow(),
            self.job_tracker.flow(),
            self.inspection.flow(),
            self.job_assignment.flow(),
        ]
    }
}

#[cfg(test)]
#[path = "fleet_tests.rs"]
mod tests;
