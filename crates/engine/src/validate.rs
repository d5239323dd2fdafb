// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration-save validation.
//!
//! Run when an operator saves project settings. Returns operator-facing
//! messages rather than errors; an empty list means the settings are
//! usable.

use limesync_core::{ProjectConfig, MAX_CODE_DIGITS, MIN_CODE_DIGITS};
use limesync_remote::{SessionManager, SurveyApi};
use std::sync::Arc;
use tracing::debug;

/// Check the settings against the live service. Connectivity, survey
/// id existence, and the digit bound are validated; anything else is
/// caught later, per operation.
pub async fn validate_project_settings<S: SurveyApi>(
    api: Arc<S>,
    config: &ProjectConfig,
) -> Vec<String> {
    let mut messages = Vec::new();

    if config.code_digits.is_some_and(|digits| digits < MIN_CODE_DIGITS) {
        messages.push(format!(
            "The number of code digits must be a positive integer >= {MIN_CODE_DIGITS}."
        ));
    }
    if config.code_digits.is_some_and(|digits| digits > MAX_CODE_DIGITS) {
        messages.push(format!("The number of code digits must be at most {MAX_CODE_DIGITS}."));
    }

    let mut session = SessionManager::new(api.clone(), config.credentials.clone());
    match session.key().await {
        Err(err) => {
            messages.push(format!("Cannot connect to the survey service: {err}"));
        }
        Ok(key) => match api.list_surveys(key).await {
            Err(err) => {
                messages.push(format!("Cannot list the surveys: {err}"));
            }
            Ok(known) => {
                let invalid: Vec<&str> = config
                    .survey_ids
                    .iter()
                    .filter(|sid| !sid.is_empty() && !known.iter().any(|k| k == *sid))
                    .map(String::as_str)
                    .collect();
                if !invalid.is_empty() {
                    messages.push(format!("Invalid survey IDs: {}", invalid.join(", ")));
                }
            }
        },
    }
    session.release().await;

    debug!(problems = messages.len(), "validated project settings");
    messages
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
