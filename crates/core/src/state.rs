// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Survey lifecycle states as persisted in the record store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion marker written to `<instrument>_complete` once a survey
/// response has been submitted.
pub const FORM_COMPLETE: &str = "2";

/// Lifecycle state of one instrument instance, stored as the value of
/// the `<instrument>_state` field.
///
/// The record store keeps the numeric wire value; an absent or
/// unrecognized value is the unset case, represented as `None` at the
/// type level rather than as a fifth variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurveyState {
    /// No remote participant exists yet.
    New,
    /// Remote participant exists and the survey link is usable.
    Active,
    /// The participant completed and submitted the survey.
    Submitted,
    /// Remote participant exists but the validity window has closed.
    Expired,
}

impl SurveyState {
    /// Wire value persisted in the record store.
    pub fn as_str(self) -> &'static str {
        match self {
            SurveyState::New => "1",
            SurveyState::Active => "2",
            SurveyState::Submitted => "3",
            SurveyState::Expired => "4",
        }
    }

    /// Parse a stored field value; anything unrecognized (including an
    /// absent field) is unset.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value? {
            "1" => Some(SurveyState::New),
            "2" => Some(SurveyState::Active),
            "3" => Some(SurveyState::Submitted),
            "4" => Some(SurveyState::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for SurveyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurveyState::New => "new",
            SurveyState::Active => "active",
            SurveyState::Submitted => "submitted",
            SurveyState::Expired => "expired",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
