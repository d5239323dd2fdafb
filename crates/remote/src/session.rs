// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifetime scoped to one unit of work.
//!
//! One `SessionManager` is created per save-event handling or per
//! project sweep iteration, and released when that unit of work ends.
//! The handle is never shared between units of work.

use crate::api::{RemoteError, SessionKey, SurveyApi};
use limesync_core::Credentials;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Handshakes slower than this get logged; the service is usually
/// fast, so a slow answer is worth noticing.
const SLOW_HANDSHAKE: Duration = Duration::from_secs(10);

pub struct SessionManager<S: SurveyApi> {
    api: Arc<S>,
    credentials: Credentials,
    key: Option<SessionKey>,
}

impl<S: SurveyApi> SessionManager<S> {
    pub fn new(api: Arc<S>, credentials: Credentials) -> Self {
        Self { api, credentials, key: None }
    }

    pub fn is_open(&self) -> bool {
        self.key.is_some()
    }

    /// The session key, opening the session on first use. Subsequent
    /// calls return the cached key. A failed handshake caches nothing,
    /// so a later call retries.
    pub async fn key(&mut self) -> Result<&SessionKey, RemoteError> {
        if self.key.is_none() {
            let started = Instant::now();
            let opened = self.api.open_session(&self.credentials).await?;
            let elapsed = started.elapsed();
            if elapsed > SLOW_HANDSHAKE {
                warn!(?elapsed, "slow survey service handshake");
            }
            self.key = Some(opened);
        }
        self.key
            .as_ref()
            .ok_or_else(|| RemoteError::Connect("session not opened".to_string()))
    }

    /// End the session, telling the service best-effort. Idempotent.
    pub async fn release(&mut self) {
        if let Some(key) = self.key.take() {
            self.api.release_session(&key).await;
        }
    }
}

impl<S: SurveyApi> Drop for SessionManager<S> {
    fn drop(&mut self) {
        // The remote side cannot be told from a sync drop; the key is
        // ephemeral server-side, so only note the missed release.
        if self.key.take().is_some() {
            debug!("session manager dropped with an open session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
