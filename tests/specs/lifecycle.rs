// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Survey lifecycle specs: activation, expiry, reactivation, deletion.

use crate::prelude::*;
use chrono::Duration;

#[tokio::test]
async fn saving_a_new_form_activates_the_survey() {
    let h = Harness::new();
    let target = baseline("r1");
    h.set(&target, "phq9_state", "1").await;

    assert!(!h.save("phq9", &["phq9_q1", "phq9_state"], &target).await);

    let code = h.value(&target, "code").unwrap();
    let participant = h.api.participant("111", &format!("{code}AA")).unwrap();
    assert_eq!(participant.firstname, "baseline");
    assert_eq!(participant.lastname, "r1");
    assert_eq!(participant.validfrom.as_deref(), Some("2026-01-15 12:00:00"));
    assert_eq!(participant.validuntil.as_deref(), Some("2026-02-14 12:00:00"));

    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("2"));
    assert_eq!(h.value(&target, "phq9_validfrom").as_deref(), Some("2026-01-15 12:00:00"));
    assert_eq!(h.value(&target, "phq9_validuntil").as_deref(), Some("2026-02-14 12:00:00"));
}

#[tokio::test]
async fn only_one_instance_per_record_stays_active() {
    let h = Harness::new();
    let first = baseline("r1");
    h.set(&first, "phq9_state", "1").await;
    h.save("phq9", &["phq9_state"], &first).await;
    assert_eq!(h.value(&first, "phq9_state").as_deref(), Some("2"));

    let second = limesync_core::SurveyTarget::new("r1", "followup", None);
    h.set(&second, "phq9_state", "1").await;
    assert!(!h.save("phq9", &["phq9_state"], &second).await);

    assert_eq!(h.value(&first, "phq9_state").as_deref(), Some("4"));
    assert_eq!(h.value(&second, "phq9_state").as_deref(), Some("2"));
}

#[tokio::test]
async fn the_two_instruments_activate_independently() {
    let h = Harness::new();
    let target = baseline("r1");
    h.set(&target, "phq9_state", "1").await;
    h.set(&target, "gad7_state", "1").await;

    h.save("phq9", &["phq9_state"], &target).await;
    h.save("gad7", &["gad7_state"], &target).await;

    let code = h.value(&target, "code").unwrap();
    assert!(h.api.participant("111", &format!("{code}AA")).is_some());
    assert!(h.api.participant("222", &format!("{code}AB")).is_some());
    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("2"));
    assert_eq!(h.value(&target, "gad7_state").as_deref(), Some("2"));
}

#[tokio::test]
async fn an_active_survey_expires_once_its_window_passes() {
    let h = Harness::new();
    let target = baseline("r1");
    h.set(&target, "phq9_state", "1").await;
    h.save("phq9", &["phq9_state"], &target).await;

    h.clock.advance(Duration::days(31));
    assert!(!h.sweep().await);

    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("4"));
}

#[tokio::test]
async fn an_expired_survey_reactivates_when_the_window_reopens() {
    let h = Harness::new();
    let target = baseline("r1");
    h.set(&target, "phq9_state", "1").await;
    h.save("phq9", &["phq9_state"], &target).await;
    h.clock.advance(Duration::days(31));
    h.sweep().await;
    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("4"));

    // The coordinator extends the deadline and saves the form again.
    h.set(&target, "phq9_validuntil", "2026-06-01 00:00:00").await;
    assert!(!h.save("phq9", &["phq9_state"], &target).await);

    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("2"));
    let code = h.value(&target, "code").unwrap();
    let participant = h.api.participant("111", &format!("{code}AA")).unwrap();
    assert_eq!(participant.validuntil.as_deref(), Some("2026-06-01 00:00:00"));
}

#[tokio::test]
async fn deleting_the_form_removes_the_remote_participant() {
    let h = Harness::new();
    let target = baseline("r1");
    h.set(&target, "phq9_state", "1").await;
    h.save("phq9", &["phq9_state"], &target).await;
    let code = h.value(&target, "code").unwrap();
    let token = format!("{code}AA");
    assert!(h.api.participant("111", &token).is_some());

    // The form is deleted in the record store; its fields vanish.
    h.store.set_field(PROJECT, &target, "phq9_state", None).await.unwrap();
    assert!(!h.save("phq9", &["phq9_state"], &target).await);

    assert!(h.api.participant("111", &token).is_none());
}

#[tokio::test]
async fn a_failed_activation_leaves_the_slot_new() {
    let h = Harness::new();
    let target = baseline("r1");
    h.set(&target, "phq9_state", "1").await;
    h.api.refuse_connections(true);

    assert!(h.save("phq9", &["phq9_state"], &target).await);

    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("1"));
    assert_eq!(h.notifier.notifications().len(), 1);

    // Once the service is back, the next save finishes the job.
    h.api.refuse_connections(false);
    assert!(!h.save("phq9", &["phq9_state"], &target).await);
    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("2"));
}
