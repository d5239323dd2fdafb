// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collision-free survey code allocation.

use crate::context::UnitOfWork;
use crate::error::SyncError;
use limesync_core::{Clock, ConfigError, SurveyTarget};
use limesync_remote::SurveyApi;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

impl<S: SurveyApi, C: Clock> UnitOfWork<'_, S, C> {
    /// The record's survey code, creating and persisting one the
    /// first time it is needed. Once written, a code is never
    /// regenerated; a second call returns the stored value.
    pub async fn allocate_code(&mut self, record: &str) -> Result<String, SyncError> {
        let field = &self.config.code_field;
        if field.is_empty() {
            return Err(ConfigError::MissingCodeField.into());
        }

        if let Some(existing) = self.store.get_record_field(self.project, record, field).await? {
            return Ok(existing);
        }

        debug!(project = %self.project, record, "creating a new survey code");
        let digits = self.config.effective_code_digits();
        let low = 10u64.pow(digits - 1);
        let high = 10u64.pow(digits) - 1;

        // One scan instead of one query per attempt; codes are the
        // values of the code field across all records of the project.
        let taken: HashSet<String> = self
            .store
            .field_rows(self.project, field)
            .await?
            .into_iter()
            .map(|row| row.value)
            .collect();

        // Try as many times as there are possible codes.
        let mut code = None;
        for _ in low..=high {
            let candidate = format!("{}{}", self.config.code_prefix, self.rng.gen_range(low..=high));
            if taken.contains(&candidate) {
                debug!(%candidate, "code is in use, trying another");
                continue;
            }
            code = Some(candidate);
            break;
        }
        let Some(code) = code else {
            return Err(ConfigError::CodeSpaceExhausted.into());
        };

        // The code lives on the event its instrument is bound to
        // within the record's arm.
        let event = self.store.find_code_event(self.project, record, field).await?;
        let slot = SurveyTarget::new(record, event.clone(), None);
        self.store.set_field(self.project, &slot, field, Some(&code)).await?;
        debug!(project = %self.project, record, %event, %code, "stored survey code");
        Ok(code)
    }
}

#[cfg(test)]
#[path = "code_tests.rs"]
mod tests;
