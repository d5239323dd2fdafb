// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn instance_one_is_normalized_to_none() {
    let explicit = SurveyTarget::new("R1", "baseline", Some(1));
    let implicit = SurveyTarget::new("R1", "baseline", None);
    assert_eq!(explicit, implicit);
    assert_eq!(explicit.instance, None);
}

#[parameterized(
    first_instance = { None, "baseline" },
    explicit_first = { Some(1), "baseline" },
    repeated = { Some(3), "baseline.3" },
)]
fn identity_key_includes_instance_only_when_repeating(instance: Option<u32>, expected: &str) {
    let target = SurveyTarget::new("R1", "baseline", instance);
    assert_eq!(target.identity_key(), expected);
}

#[test]
fn display_is_dotted_path() {
    assert_eq!(SurveyTarget::new("R1", "followup", Some(2)).to_string(), "R1.followup.2");
    assert_eq!(SurveyTarget::new("R1", "followup", None).to_string(), "R1.followup");
}
