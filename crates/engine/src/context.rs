// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-unit-of-work context.
//!
//! One `UnitOfWork` exists per save-event handling or per project
//! sweep iteration. It owns the remote session for that span and
//! accumulates the error flag, so concurrent units of work never
//! share mutable state.

use crate::error::SyncError;
use crate::notify::AdminNotifier;
use limesync_core::{Clock, ProjectConfig, ProjectId};
use limesync_remote::{RemoteError, SessionKey, SessionManager, SurveyApi};
use limesync_store::RecordStore;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use tracing::error;

pub struct UnitOfWork<'a, S: SurveyApi, C: Clock> {
    pub(crate) project: ProjectId,
    pub(crate) store: &'a dyn RecordStore,
    pub(crate) api: Arc<S>,
    pub(crate) session: SessionManager<S>,
    pub(crate) config: &'a ProjectConfig,
    pub(crate) clock: C,
    pub(crate) notifier: &'a dyn AdminNotifier,
    pub(crate) rng: Box<dyn RngCore + Send>,
    errored: bool,
}

impl<'a, S: SurveyApi, C: Clock> UnitOfWork<'a, S, C> {
    pub fn new(
        project: ProjectId,
        store: &'a dyn RecordStore,
        api: Arc<S>,
        config: &'a ProjectConfig,
        clock: C,
        notifier: &'a dyn AdminNotifier,
    ) -> Self {
        let session = SessionManager::new(api.clone(), config.credentials.clone());
        Self {
            project,
            store,
            api,
            session,
            config,
            clock,
            notifier,
            rng: Box::new(StdRng::from_entropy()),
            errored: false,
        }
    }

    /// Replace the code-drawing rng; tests use a seeded one.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// The remote session key, opened lazily on first use.
    pub(crate) async fn session_key(&mut self) -> Result<SessionKey, RemoteError> {
        Ok(self.session.key().await?.clone())
    }

    /// Log an error, flag the unit of work, and tell the admin.
    pub(crate) async fn record_error(&mut self, scope: &str, err: &SyncError) {
        self.errored = true;
        error!(project = %self.project, scope, error = %err, "sync error");
        self.notifier.notify("limesync error", &format!("{}: {}", scope, err)).await;
    }

    pub fn errored(&self) -> bool {
        self.errored
    }

    /// End the unit of work: release the remote session and report
    /// whether any error was recorded.
    pub async fn finish(mut self) -> bool {
        self.session.release().await;
        self.errored
    }
}
