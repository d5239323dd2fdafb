// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The survey-lifecycle state machine.
//!
//! Dispatches on the persisted state of one (record, instrument,
//! event, instance) slot and carries out the next transition. Local
//! state is only written after the corresponding remote call
//! succeeded, so a failed transition leaves the slot untouched and
//! the next trigger retries it.

use crate::context::UnitOfWork;
use crate::error::SyncError;
use limesync_core::window::{default_validfrom, default_validuntil};
use limesync_core::{
    build_token, parse_datetime, Clock, InstrumentBinding, InstrumentSchema, SurveyState,
    SurveyTarget, Token, ValidityWindow, FORM_COMPLETE,
};
use limesync_remote::{Participant, SurveyApi};
use limesync_store::FieldWrite;
use std::collections::BTreeMap;
use tracing::debug;

impl<S: SurveyApi, C: Clock> UnitOfWork<'_, S, C> {
    /// Entry point for a record-save notification.
    ///
    /// `instrument_fields` is the saved instrument's field list; when
    /// it contains the configured code field, a code is allocated for
    /// the record right away. When the instrument is connected to a
    /// remote survey, the slot's state decides the transition.
    /// Failures are logged and flagged, never propagated: one broken
    /// slot must not block the save pipeline.
    pub async fn handle_record_saved(
        &mut self,
        instrument: &str,
        instrument_fields: &[String],
        target: &SurveyTarget,
    ) {
        let config = self.config;
        if !config.code_field.is_empty()
            && instrument_fields.iter().any(|f| f == &config.code_field)
        {
            if let Err(err) = self.allocate_code(&target.record).await {
                self.record_error("record saved: code", &err).await;
            }
        }

        if config.instruments.iter().any(|name| name == instrument) {
            let step = match config.binding(instrument) {
                Ok(binding) => self.step_survey_form(&binding, target).await,
                Err(err) => Err(err.into()),
            };
            if let Err(err) = step {
                self.record_error("record saved", &err).await;
            }
        }
    }

    async fn step_survey_form(
        &mut self,
        binding: &InstrumentBinding,
        target: &SurveyTarget,
    ) -> Result<(), SyncError> {
        let stored = self.store.get_field(self.project, target, &binding.schema.state).await?;
        let state = SurveyState::parse(stored.as_deref());
        debug!(project = %self.project, %target, instrument = %binding.schema.instrument,
            ?state, "record saved");
        match state {
            Some(SurveyState::New) => self.activate(binding, target).await,
            Some(SurveyState::Active) => self.revalidate_active(binding, target).await,
            Some(SurveyState::Expired) => self.reactivate_expired(binding, target).await,
            // Nothing left to reconcile once submitted.
            Some(SurveyState::Submitted) => Ok(()),
            None => self.delete_if_removed(binding, target).await,
        }
    }

    /// NEW to ACTIVE: create the remote participant, then expire
    /// every sibling and mark this slot active.
    async fn activate(
        &mut self,
        binding: &InstrumentBinding,
        target: &SurveyTarget,
    ) -> Result<(), SyncError> {
        debug!(project = %self.project, %target, instrument = %binding.schema.instrument,
            "activating survey");
        let token = self.token_for(binding, &target.record).await?;
        let window = self.validity_window(&binding.schema, target).await?;

        let mut participant = Participant {
            tid: String::new(),
            token: token.as_str().to_string(),
            firstname: target.identity_key(),
            lastname: target.record.clone(),
            validfrom: Some(window.from.clone()),
            validuntil: Some(window.until.clone()),
            attributes: BTreeMap::new(),
        };
        let attribute_fields = &self.config.attribute_fields;
        for (position, field) in attribute_fields.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            if let Some(value) =
                self.store.get_record_field(self.project, &target.record, field).await?
            {
                participant.attributes.insert(format!("attribute_{}", position + 1), value);
            }
        }

        let key = self.session_key().await?;
        self.api.add_participant(&key, &binding.survey_id, &participant).await?;
        self.mark_active(&binding.schema, target).await
    }

    /// Expire every ACTIVE instance of this instrument for the record
    /// in one batched write, then mark this slot ACTIVE.
    ///
    /// Read-then-write without a lock: two concurrent saves for the
    /// same record could both pass the scan. Saves for one record are
    /// serialized upstream, which is what makes this acceptable.
    async fn mark_active(
        &mut self,
        schema: &InstrumentSchema,
        target: &SurveyTarget,
    ) -> Result<(), SyncError> {
        let rows = self.store.field_rows(self.project, &schema.state).await?;
        let writes: Vec<FieldWrite> = rows
            .into_iter()
            .filter(|row| {
                row.record == target.record && row.value == SurveyState::Active.as_str()
            })
            .map(|row| FieldWrite {
                target: row.target(),
                field: schema.state.clone(),
                value: Some(SurveyState::Expired.as_str().to_string()),
            })
            .collect();
        if !writes.is_empty() {
            debug!(project = %self.project, record = %target.record, count = writes.len(),
                "expiring sibling surveys");
            self.store.set_fields(self.project, &writes).await?;
        }
        self.set_state(schema, target, SurveyState::Active).await
    }

    /// ACTIVE on save: verify the remote participant still belongs to
    /// this slot and push changed validity dates.
    async fn revalidate_active(
        &mut self,
        binding: &InstrumentBinding,
        target: &SurveyTarget,
    ) -> Result<(), SyncError> {
        let token = self.token_for(binding, &target.record).await?;
        let key = self.session_key().await?;
        let participant =
            self.api.get_participant(&key, &binding.survey_id, token.as_str()).await?;

        // A missing or foreign participant is not an error; the slot
        // just is not active remotely anymore.
        let matching = participant.filter(|p| p.firstname == target.identity_key());
        let Some(participant) = matching else {
            debug!(project = %self.project, %target, "no matching participant, expiring");
            return self.set_state(&binding.schema, target, SurveyState::Expired).await;
        };

        let window = self.validity_window(&binding.schema, target).await?;
        let changed = participant.validfrom.as_deref() != Some(window.from.as_str())
            || participant.validuntil.as_deref() != Some(window.until.as_str());
        if changed {
            let mut properties = BTreeMap::new();
            properties.insert("validfrom".to_string(), window.from.clone());
            properties.insert("validuntil".to_string(), window.until.clone());
            self.api
                .set_participant(&key, &binding.survey_id, &participant.tid, &properties)
                .await?;
            if window.expired(self.clock.now()) {
                debug!(project = %self.project, %target, "validity window closed, expiring");
                self.set_state(&binding.schema, target, SurveyState::Expired).await?;
            }
        }
        Ok(())
    }

    /// EXPIRED on save: if the recorded window reopened, run the
    /// activation path again.
    async fn reactivate_expired(
        &mut self,
        binding: &InstrumentBinding,
        target: &SurveyTarget,
    ) -> Result<(), SyncError> {
        let until = self.valid_until(&binding.schema, target).await?;
        let now = self.clock.now();
        if parse_datetime(&until).is_some_and(|u| u > now) {
            debug!(project = %self.project, %target, "validity window reopened, reactivating");
            return self.activate(binding, target).await;
        }
        Ok(())
    }

    /// State and completion flag both unset means the form was
    /// deleted; remove the matching remote participant too.
    async fn delete_if_removed(
        &mut self,
        binding: &InstrumentBinding,
        target: &SurveyTarget,
    ) -> Result<(), SyncError> {
        let complete =
            self.store.get_field(self.project, target, &binding.schema.complete).await?;
        if complete.is_some() {
            return Ok(());
        }
        let token = self.token_for(binding, &target.record).await?;
        let key = self.session_key().await?;
        let participant =
            self.api.get_participant(&key, &binding.survey_id, token.as_str()).await?;
        let Some(participant) = participant.filter(|p| p.firstname == target.identity_key())
        else {
            return Ok(());
        };
        debug!(project = %self.project, %target, tid = %participant.tid,
            "form deleted, removing remote participant");
        self.api
            .delete_participants(&key, &binding.survey_id, &[participant.tid])
            .await?;
        Ok(())
    }

    /// Sweep-side check of one ACTIVE slot: pick up a submitted
    /// response, otherwise verify the participant still matches.
    pub async fn check_active(
        &mut self,
        binding: &InstrumentBinding,
        target: &SurveyTarget,
    ) -> Result<(), SyncError> {
        let token = self.token_for(binding, &target.record).await?;
        let key = self.session_key().await?;
        let responses = self
            .api
            .export_completed_by_token(&key, &binding.survey_id, token.as_str())
            .await?;
        let identity = target.identity_key();

        if let Some(response) =
            responses.iter().find(|r| r.record == target.record && r.event == identity)
        {
            debug!(project = %self.project, %target, "survey completed");
            let schema = &binding.schema;
            let writes = vec![
                field_write(target, &schema.startdate, &response.startdate),
                field_write(target, &schema.submitdate, &response.submitdate),
                field_write(target, &schema.state, SurveyState::Submitted.as_str()),
                field_write(target, &schema.complete, FORM_COMPLETE),
            ];
            self.store.set_fields(self.project, &writes).await?;
            return Ok(());
        }

        let participant =
            self.api.get_participant(&key, &binding.survey_id, token.as_str()).await?;
        if participant.is_none_or(|p| p.firstname != identity) {
            debug!(project = %self.project, %target, "missing participant entry, expiring");
            self.set_state(&binding.schema, target, SurveyState::Expired).await?;
        }
        Ok(())
    }

    pub(crate) async fn set_state(
        &mut self,
        schema: &InstrumentSchema,
        target: &SurveyTarget,
        state: SurveyState,
    ) -> Result<(), SyncError> {
        self.store
            .set_field(self.project, target, &schema.state, Some(state.as_str()))
            .await?;
        Ok(())
    }

    pub(crate) async fn token_for(
        &mut self,
        binding: &InstrumentBinding,
        record: &str,
    ) -> Result<Token, SyncError> {
        let code = self.allocate_code(record).await?;
        Ok(build_token(&code, binding.index, &self.config.appendixes)?)
    }

    /// Read the slot's validity window, filling absent halves with the
    /// defaults and persisting them immediately so repeated reads are
    /// stable.
    pub(crate) async fn validity_window(
        &mut self,
        schema: &InstrumentSchema,
        target: &SurveyTarget,
    ) -> Result<ValidityWindow, SyncError> {
        let from = match self.store.get_field(self.project, target, &schema.validfrom).await? {
            Some(value) => value,
            None => {
                let value = default_validfrom(self.clock.now());
                debug!(%target, %value, "filling empty validfrom");
                self.store
                    .set_field(self.project, target, &schema.validfrom, Some(&value))
                    .await?;
                value
            }
        };
        let until = self.valid_until(schema, target).await?;
        Ok(ValidityWindow { from, until })
    }

    async fn valid_until(
        &mut self,
        schema: &InstrumentSchema,
        target: &SurveyTarget,
    ) -> Result<String, SyncError> {
        match self.store.get_field(self.project, target, &schema.validuntil).await? {
            Some(value) => Ok(value),
            None => {
                let value = default_validuntil(self.clock.now());
                debug!(%target, %value, "filling empty validuntil");
                self.store
                    .set_field(self.project, target, &schema.validuntil, Some(&value))
                    .await?;
                Ok(value)
            }
        }
    }
}

fn field_write(target: &SurveyTarget, field: &str, value: &str) -> FieldWrite {
    FieldWrite {
        target: target.clone(),
        field: field.to_string(),
        value: Some(value.to_string()),
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
