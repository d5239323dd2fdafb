// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared scenario fixture.

use chrono::{TimeZone, Utc};
use limesync_core::{Credentials, FakeClock, ProjectConfig, ProjectId};
use limesync_engine::{FakeNotifier, UnitOfWork};
use limesync_remote::FakeSurveyApi;
use limesync_store::MemoryRecordStore;
use std::sync::Arc;

pub use limesync_core::SurveyTarget;
pub use limesync_store::RecordStore;

pub const PROJECT: ProjectId = ProjectId(42);

/// A project with two survey instruments and a code field, plus the
/// scripted collaborators, wired the way an embedding would wire the
/// real ones.
pub struct Harness {
    pub store: Arc<MemoryRecordStore>,
    pub api: Arc<FakeSurveyApi>,
    pub clock: FakeClock,
    pub config: ProjectConfig,
    pub notifier: FakeNotifier,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryRecordStore::new());
        store.bind_code_event(PROJECT, "baseline");
        let api = Arc::new(FakeSurveyApi::new());
        api.set_surveys(&["111", "222"]);
        Self {
            store,
            api,
            clock: FakeClock::new(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()),
            config: ProjectConfig {
                code_field: "code".to_string(),
                instruments: vec!["phq9".to_string(), "gad7".to_string()],
                survey_ids: vec!["111".to_string(), "222".to_string()],
                appendixes: vec!["AA".to_string(), "AB".to_string()],
                attribute_fields: vec![],
                code_prefix: String::new(),
                code_digits: None,
                credentials: Credentials { user: "bot".to_string(), pass: "pw".to_string() },
            },
            notifier: FakeNotifier::default(),
        }
    }

    /// Run one record-save notification; returns whether the unit of
    /// work recorded an error.
    pub async fn save(&self, instrument: &str, fields: &[&str], target: &SurveyTarget) -> bool {
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        let mut unit = self.unit();
        unit.handle_record_saved(instrument, &fields, target).await;
        unit.finish().await
    }

    /// Run one project sweep pass.
    pub async fn sweep(&self) -> bool {
        let mut unit = self.unit();
        unit.sweep_project().await;
        unit.finish().await
    }

    fn unit(&self) -> UnitOfWork<'_, FakeSurveyApi, FakeClock> {
        UnitOfWork::new(
            PROJECT,
            self.store.as_ref(),
            self.api.clone(),
            &self.config,
            self.clock.clone(),
            &self.notifier,
        )
    }

    pub async fn set(&self, target: &SurveyTarget, field: &str, value: &str) {
        self.store.set_field(PROJECT, target, field, Some(value)).await.unwrap();
    }

    pub fn value(&self, target: &SurveyTarget, field: &str) -> Option<String> {
        self.store.value(PROJECT, target, field)
    }
}

pub fn baseline(record: &str) -> SurveyTarget {
    SurveyTarget::new(record, "baseline", None)
}
