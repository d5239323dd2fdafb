// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Survey code allocation specs.

use crate::prelude::*;
use std::collections::HashSet;

#[tokio::test]
async fn a_code_is_allocated_when_the_code_field_is_saved() {
    let h = Harness::new();
    let target = baseline("r1");

    assert!(!h.save("enrollment", &["code", "consent"], &target).await);

    let code = h.value(&target, "code").unwrap();
    let digits = h.config.effective_code_digits();
    assert_eq!(code.len() as u32, digits);
    assert!(code.chars().all(|c| c.is_ascii_digit()), "{code}");
}

#[tokio::test]
async fn the_code_survives_repeated_saves() {
    let h = Harness::new();
    let target = baseline("r1");

    h.save("enrollment", &["code"], &target).await;
    let first = h.value(&target, "code").unwrap();
    h.save("enrollment", &["code"], &target).await;
    let second = h.value(&target, "code").unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn records_never_share_a_code() {
    let h = Harness::new();

    let mut codes = HashSet::new();
    for record in ["r1", "r2", "r3", "r4", "r5"] {
        let target = baseline(record);
        h.save("enrollment", &["code"], &target).await;
        codes.insert(h.value(&target, "code").unwrap());
    }

    assert_eq!(codes.len(), 5);
}

#[tokio::test]
async fn a_configured_prefix_is_carried_into_the_code() {
    let mut h = Harness::new();
    h.config.code_prefix = "XY".to_string();
    let target = baseline("r1");

    h.save("enrollment", &["code"], &target).await;

    let code = h.value(&target, "code").unwrap();
    assert!(code.starts_with("XY"), "{code}");
}

#[tokio::test]
async fn saves_without_the_code_field_allocate_nothing() {
    let h = Harness::new();
    let target = baseline("r1");

    assert!(!h.save("demographics", &["name", "dob"], &target).await);

    assert!(h.value(&target, "code").is_none());
}
