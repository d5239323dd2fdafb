// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic reconciliation with error backoff.

use crate::context::UnitOfWork;
use crate::notify::AdminNotifier;
use async_trait::async_trait;
use limesync_core::{Clock, ProjectConfig, ProjectId};
use limesync_remote::SurveyApi;
use limesync_store::RecordStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Seconds between sweeps when the previous pass was clean.
pub const DEFAULT_SWEEP_INTERVAL: u64 = 60;

/// Backoff ceiling. A service that stays down doubles the interval
/// only up to one sweep per day.
pub const MAX_SWEEP_INTERVAL: u64 = 86_400;

/// Persistence for the adaptive sweep interval, so backoff survives a
/// process restart.
#[async_trait]
pub trait SweepStore: Send + Sync {
    async fn interval(&self) -> u64;
    async fn set_interval(&self, secs: u64);
}

/// Source of the projects a sweep covers. Only enabled projects with
/// a complete configuration belong here.
#[async_trait]
pub trait ProjectRegistry: Send + Sync {
    async fn enabled_projects(&self) -> Vec<(ProjectId, ProjectConfig)>;
}

/// Outcome of one sweep pass, mostly for tests and operator logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub projects: usize,
    pub failures: usize,
    /// The interval that will precede the next pass.
    pub next_interval: u64,
}

/// Drives [`UnitOfWork::sweep_project`] over every enabled project on
/// a timer. Any failure in a pass doubles the interval; the first
/// clean pass snaps it back to the default.
pub struct ReconciliationScheduler<S: SurveyApi, C: Clock> {
    api: Arc<S>,
    store: Arc<dyn RecordStore>,
    registry: Arc<dyn ProjectRegistry>,
    sweep_store: Arc<dyn SweepStore>,
    notifier: Arc<dyn AdminNotifier>,
    clock: C,
}

impl<S: SurveyApi, C: Clock> ReconciliationScheduler<S, C> {
    pub fn new(
        api: Arc<S>,
        store: Arc<dyn RecordStore>,
        registry: Arc<dyn ProjectRegistry>,
        sweep_store: Arc<dyn SweepStore>,
        notifier: Arc<dyn AdminNotifier>,
        clock: C,
    ) -> Self {
        Self { api, store, registry, sweep_store, notifier, clock }
    }

    /// Sleep-and-sweep until the task is dropped.
    pub async fn run(&self) {
        info!("reconciliation scheduler started");
        loop {
            let interval = self.sweep_store.interval().await;
            tokio::time::sleep(Duration::from_secs(interval)).await;
            self.run_sweep().await;
        }
    }

    /// One pass over every enabled project, then the interval update.
    pub async fn run_sweep(&self) -> SweepReport {
        let projects = self.registry.enabled_projects().await;
        let mut failures = 0;
        for (project, config) in &projects {
            let mut unit = UnitOfWork::new(
                *project,
                self.store.as_ref(),
                self.api.clone(),
                config,
                self.clock.clone(),
                self.notifier.as_ref(),
            );
            unit.sweep_project().await;
            if unit.finish().await {
                failures += 1;
            }
        }

        let next_interval = self.update_interval(failures > 0).await;
        info!(projects = projects.len(), failures, next_interval, "sweep pass finished");
        SweepReport { projects: projects.len(), failures, next_interval }
    }

    /// Double on failure, capped; a clean pass snaps a backed-off
    /// interval back to the default.
    async fn update_interval(&self, errored: bool) -> u64 {
        let current = self.sweep_store.interval().await;
        let next = if errored {
            current.saturating_mul(2).min(MAX_SWEEP_INTERVAL)
        } else {
            current.min(DEFAULT_SWEEP_INTERVAL)
        };
        if next != current {
            if errored {
                warn!(current, next, "sweep failed, backing off");
            } else {
                info!(current, next, "sweep clean, restoring default interval");
            }
            self.sweep_store.set_interval(next).await;
        }
        next
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
