// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn schema_derives_all_six_field_names() {
    let schema = InstrumentSchema::new("survey1");
    assert_eq!(schema.state, "survey1_state");
    assert_eq!(schema.validfrom, "survey1_validfrom");
    assert_eq!(schema.validuntil, "survey1_validuntil");
    assert_eq!(schema.startdate, "survey1_startdate");
    assert_eq!(schema.submitdate, "survey1_submitdate");
    assert_eq!(schema.complete, "survey1_complete");
}
