// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings validation specs.

use crate::prelude::*;
use limesync_engine::validate_project_settings;

#[tokio::test]
async fn good_settings_pass_silently() {
    let h = Harness::new();

    let messages = validate_project_settings(h.api.clone(), &h.config).await;
    assert!(messages.is_empty(), "{messages:?}");
}

#[tokio::test]
async fn every_problem_is_reported_at_once() {
    let h = Harness::new();
    h.api.set_surveys(&["111"]);
    let mut config = h.config.clone();
    config.code_digits = Some(1);

    let messages = validate_project_settings(h.api.clone(), &config).await;

    assert_eq!(messages.len(), 2);
    assert!(messages.iter().any(|m| m.contains("code digits")), "{messages:?}");
    assert!(messages.iter().any(|m| m == "Invalid survey IDs: 222"), "{messages:?}");
}

#[tokio::test]
async fn an_unreachable_service_is_the_only_connectivity_message() {
    let h = Harness::new();
    h.api.refuse_connections(true);

    let messages = validate_project_settings(h.api.clone(), &h.config).await;

    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Cannot connect to the survey service:"), "{messages:?}");
}
