// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory scheduler collaborators for tests.

use crate::notify::AdminNotifier;
use crate::scheduler::{ProjectRegistry, SweepStore, DEFAULT_SWEEP_INTERVAL};
use async_trait::async_trait;
use limesync_core::{ProjectConfig, ProjectId};
use parking_lot::Mutex;

/// Fixed project list.
#[derive(Default)]
pub struct StaticProjects {
    projects: Vec<(ProjectId, ProjectConfig)>,
}

impl StaticProjects {
    pub fn new(projects: Vec<(ProjectId, ProjectConfig)>) -> Self {
        Self { projects }
    }
}

#[async_trait]
impl ProjectRegistry for StaticProjects {
    async fn enabled_projects(&self) -> Vec<(ProjectId, ProjectConfig)> {
        self.projects.clone()
    }
}

/// Interval persistence backed by a mutex.
pub struct MemorySweepStore {
    interval: Mutex<u64>,
}

impl MemorySweepStore {
    pub fn with_interval(secs: u64) -> Self {
        Self { interval: Mutex::new(secs) }
    }
}

impl Default for MemorySweepStore {
    fn default() -> Self {
        Self::with_interval(DEFAULT_SWEEP_INTERVAL)
    }
}

#[async_trait]
impl SweepStore for MemorySweepStore {
    async fn interval(&self) -> u64 {
        *self.interval.lock()
    }

    async fn set_interval(&self, secs: u64) {
        *self.interval.lock() = secs;
    }
}

/// Notifier that records every message for assertions.
#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeNotifier {
    /// `(subject, message)` pairs in send order.
    pub fn notifications(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl AdminNotifier for FakeNotifier {
    async fn notify(&self, subject: &str, message: &str) {
        self.sent.lock().push((subject.to_string(), message.to_string()));
    }
}
