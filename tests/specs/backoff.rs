// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sweep scheduling specs: the interval doubles while the service is
//! down and snaps back once a pass is clean.

use crate::prelude::*;
use limesync_core::FakeClock;
use limesync_engine::{
    LogOnlyNotifier, MemorySweepStore, ReconciliationScheduler, StaticProjects, SweepStore,
    DEFAULT_SWEEP_INTERVAL, MAX_SWEEP_INTERVAL,
};
use limesync_remote::FakeSurveyApi;
use std::sync::Arc;

fn scheduler(
    h: &Harness,
    interval: u64,
) -> (ReconciliationScheduler<FakeSurveyApi, FakeClock>, Arc<MemorySweepStore>) {
    let sweep_store = Arc::new(MemorySweepStore::with_interval(interval));
    let scheduler = ReconciliationScheduler::new(
        h.api.clone(),
        h.store.clone(),
        Arc::new(StaticProjects::new(vec![(PROJECT, h.config.clone())])),
        sweep_store.clone(),
        Arc::new(LogOnlyNotifier),
        h.clock.clone(),
    );
    (scheduler, sweep_store)
}

async fn seed_active(h: &Harness) {
    let target = baseline("r1");
    h.set(&target, "phq9_state", "1").await;
    assert!(!h.save("phq9", &["phq9_state"], &target).await);
}

#[tokio::test]
async fn outages_double_the_interval_until_the_ceiling() {
    let h = Harness::new();
    seed_active(&h).await;
    h.api.refuse_connections(true);
    let (scheduler, sweep_store) = scheduler(&h, DEFAULT_SWEEP_INTERVAL);

    let mut expected = DEFAULT_SWEEP_INTERVAL;
    for _ in 0..20 {
        let report = scheduler.run_sweep().await;
        expected = (expected * 2).min(MAX_SWEEP_INTERVAL);
        assert_eq!(report.next_interval, expected);
        assert_eq!(report.failures, 1);
    }
    assert_eq!(sweep_store.interval().await, MAX_SWEEP_INTERVAL);
}

#[tokio::test]
async fn the_first_clean_pass_restores_the_default() {
    let h = Harness::new();
    seed_active(&h).await;
    h.api.refuse_connections(true);
    let (scheduler, sweep_store) = scheduler(&h, DEFAULT_SWEEP_INTERVAL);
    scheduler.run_sweep().await;
    scheduler.run_sweep().await;
    assert_eq!(sweep_store.interval().await, 4 * DEFAULT_SWEEP_INTERVAL);

    h.api.refuse_connections(false);
    let report = scheduler.run_sweep().await;

    assert_eq!(report.failures, 0);
    assert_eq!(report.next_interval, DEFAULT_SWEEP_INTERVAL);
    assert_eq!(sweep_store.interval().await, DEFAULT_SWEEP_INTERVAL);
}

#[tokio::test]
async fn a_pass_with_no_projects_is_clean() {
    let h = Harness::new();
    let sweep_store = Arc::new(MemorySweepStore::with_interval(960));
    let scheduler = ReconciliationScheduler::new(
        h.api.clone(),
        h.store.clone(),
        Arc::new(StaticProjects::default()),
        sweep_store.clone(),
        Arc::new(LogOnlyNotifier),
        h.clock.clone(),
    );

    let report = scheduler.run_sweep().await;

    assert_eq!(report.projects, 0);
    assert_eq!(report.next_interval, DEFAULT_SWEEP_INTERVAL);
}
