// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission pick-up specs: the sweep is the only path that learns
//! about responses completed on the remote service.

use crate::prelude::*;
use limesync_remote::CompletedResponse;

async fn activate(h: &Harness, target: &SurveyTarget) -> String {
    h.set(target, "phq9_state", "1").await;
    assert!(!h.save("phq9", &["phq9_state"], target).await);
    let code = h.value(target, "code").unwrap();
    format!("{code}AA")
}

#[tokio::test]
async fn a_completed_response_is_written_back() {
    let h = Harness::new();
    let target = baseline("r1");
    let token = activate(&h, &target).await;
    h.api.insert_completed(
        "111",
        &token,
        CompletedResponse {
            record: "r1".to_string(),
            event: "baseline".to_string(),
            startdate: "2026-01-16 09:00:00".to_string(),
            submitdate: "2026-01-16 09:20:00".to_string(),
        },
    );

    assert!(!h.sweep().await);

    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("3"));
    assert_eq!(h.value(&target, "phq9_complete").as_deref(), Some("2"));
    assert_eq!(h.value(&target, "phq9_startdate").as_deref(), Some("2026-01-16 09:00:00"));
    assert_eq!(h.value(&target, "phq9_submitdate").as_deref(), Some("2026-01-16 09:20:00"));
}

#[tokio::test]
async fn a_submission_for_another_slot_is_not_claimed() {
    let h = Harness::new();
    let target = baseline("r1");
    let token = activate(&h, &target).await;
    h.api.insert_completed(
        "111",
        &token,
        CompletedResponse {
            record: "r1".to_string(),
            event: "followup".to_string(),
            ..Default::default()
        },
    );

    assert!(!h.sweep().await);

    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("2"));
    assert!(h.value(&target, "phq9_complete").is_none());
}

#[tokio::test]
async fn a_submitted_slot_is_never_touched_again() {
    let h = Harness::new();
    let target = baseline("r1");
    let token = activate(&h, &target).await;
    h.api.insert_completed(
        "111",
        &token,
        CompletedResponse {
            record: "r1".to_string(),
            event: "baseline".to_string(),
            ..Default::default()
        },
    );
    h.sweep().await;
    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("3"));

    // Further saves and sweeps leave the slot alone.
    assert!(!h.save("phq9", &["phq9_state"], &target).await);
    assert!(!h.sweep().await);
    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("3"));
}

#[tokio::test]
async fn a_vanished_participant_expires_during_the_sweep() {
    let h = Harness::new();
    let target = baseline("r1");
    let token = activate(&h, &target).await;
    // Someone removed the participant directly on the service.
    let tid = h.api.participant("111", &token).unwrap().tid;
    let key = limesync_remote::SessionKey::new("cleanup");
    use limesync_remote::SurveyApi;
    h.api.delete_participants(&key, "111", &[tid]).await.unwrap();

    assert!(!h.sweep().await);

    assert_eq!(h.value(&target, "phq9_state").as_deref(), Some("4"));
}
