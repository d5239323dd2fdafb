// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-project sweep pass.
//!
//! Saves only reconcile slots the record store hears about; a survey
//! submitted on the remote service produces no save event at all. The
//! sweep closes that gap: it walks every ACTIVE slot of the project,
//! pulls completed responses, and expires slots whose validity window
//! has passed.

use crate::context::UnitOfWork;
use crate::error::SyncError;
use limesync_core::{parse_datetime, Clock, InstrumentBinding, SurveyState, SurveyTarget};
use limesync_remote::SurveyApi;
use limesync_store::FieldWrite;
use std::collections::HashMap;
use tracing::{debug, info};

impl<S: SurveyApi, C: Clock> UnitOfWork<'_, S, C> {
    /// One sweep over the project. Slot failures are recorded and do
    /// not stop the pass; the caller reads the flag off `finish`.
    pub async fn sweep_project(&mut self) {
        let bindings = self.config.bindings();
        for binding in &bindings {
            if let Err(err) = self.sweep_instrument(binding).await {
                self.record_error("sweep", &err).await;
            }
        }
    }

    async fn sweep_instrument(&mut self, binding: &InstrumentBinding) -> Result<(), SyncError> {
        let active = self.active_slots(binding).await?;
        debug!(project = %self.project, instrument = %binding.schema.instrument,
            active = active.len(), "sweeping instrument");
        for target in &active {
            if let Err(err) = self.check_active(binding, target).await {
                self.record_error("sweep: active slot", &err).await;
            }
        }
        self.expire_overdue(binding).await
    }

    async fn active_slots(
        &mut self,
        binding: &InstrumentBinding,
    ) -> Result<Vec<SurveyTarget>, SyncError> {
        let rows = self.store.field_rows(self.project, &binding.schema.state).await?;
        Ok(rows
            .into_iter()
            .filter(|row| row.value == SurveyState::Active.as_str())
            .map(|row| row.target())
            .collect())
    }

    /// Expire, in one batched write, every slot still ACTIVE whose
    /// validity deadline lies in the past. Slots without a recorded
    /// deadline never expire here; they wait for the default fill on
    /// their next save.
    async fn expire_overdue(&mut self, binding: &InstrumentBinding) -> Result<(), SyncError> {
        let schema = &binding.schema;
        // Re-read the states: a submission picked up above moved its
        // slot out of ACTIVE already.
        let states = self.store.field_rows(self.project, &schema.state).await?;
        let deadlines: HashMap<SurveyTarget, String> = self
            .store
            .field_rows(self.project, &schema.validuntil)
            .await?
            .into_iter()
            .map(|row| (row.target(), row.value))
            .collect();
        let now = self.clock.now();

        let writes: Vec<FieldWrite> = states
            .into_iter()
            .filter(|row| row.value == SurveyState::Active.as_str())
            .filter_map(|row| {
                let target = row.target();
                let until = deadlines.get(&target)?;
                let deadline = parse_datetime(until)?;
                (deadline < now).then(|| FieldWrite {
                    target,
                    field: schema.state.clone(),
                    value: Some(SurveyState::Expired.as_str().to_string()),
                })
            })
            .collect();
        if !writes.is_empty() {
            info!(project = %self.project, instrument = %schema.instrument,
                count = writes.len(), "expiring overdue surveys");
            self.store.set_fields(self.project, &writes).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
