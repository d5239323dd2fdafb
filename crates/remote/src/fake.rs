// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted survey service for tests.

use crate::api::{CompletedResponse, Participant, RemoteError, SessionKey, SurveyApi};
use async_trait::async_trait;
use limesync_core::Credentials;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    surveys: Vec<String>,
    /// (survey id, token) -> participant
    participants: HashMap<(String, String), Participant>,
    /// (survey id, token) -> completed responses
    completed: HashMap<(String, String), Vec<CompletedResponse>>,
    calls: Vec<String>,
    next_tid: u64,
    sessions_opened: u64,
    sessions_released: u64,
    refuse_connections: bool,
    fail_requests: bool,
}

impl Inner {
    fn guard(&mut self, call: &str) -> Result<(), RemoteError> {
        self.calls.push(call.to_string());
        if self.fail_requests {
            return Err(RemoteError::Status(format!("{}: injected failure", call)));
        }
        Ok(())
    }
}

/// In-memory `SurveyApi` with failure injection and a call log.
#[derive(Default)]
pub struct FakeSurveyApi {
    inner: Mutex<Inner>,
}

impl FakeSurveyApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_surveys(&self, sids: &[&str]) {
        self.inner.lock().surveys = sids.iter().map(|s| s.to_string()).collect();
    }

    pub fn insert_participant(&self, survey_id: &str, participant: Participant) {
        let mut inner = self.inner.lock();
        if participant.tid.is_empty() {
            // keep scripted participants addressable for deletion
            inner.next_tid += 1;
            let mut participant = participant;
            participant.tid = inner.next_tid.to_string();
            inner
                .participants
                .insert((survey_id.to_string(), participant.token.clone()), participant);
        } else {
            inner
                .participants
                .insert((survey_id.to_string(), participant.token.clone()), participant);
        }
    }

    pub fn insert_completed(&self, survey_id: &str, token: &str, response: CompletedResponse) {
        self.inner
            .lock()
            .completed
            .entry((survey_id.to_string(), token.to_string()))
            .or_default()
            .push(response);
    }

    /// Every `open_session` fails with a connection error.
    pub fn refuse_connections(&self, refuse: bool) {
        self.inner.lock().refuse_connections = refuse;
    }

    /// Every API request (after a successful handshake) fails.
    pub fn fail_requests(&self, fail: bool) {
        self.inner.lock().fail_requests = fail;
    }

    pub fn participant(&self, survey_id: &str, token: &str) -> Option<Participant> {
        self.inner
            .lock()
            .participants
            .get(&(survey_id.to_string(), token.to_string()))
            .cloned()
    }

    pub fn participant_count(&self) -> usize {
        self.inner.lock().participants.len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    pub fn sessions_opened(&self) -> u64 {
        self.inner.lock().sessions_opened
    }

    pub fn sessions_released(&self) -> u64 {
        self.inner.lock().sessions_released
    }
}

#[async_trait]
impl SurveyApi for FakeSurveyApi {
    async fn open_session(&self, _credentials: &Credentials) -> Result<SessionKey, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push("open_session".to_string());
        if inner.refuse_connections {
            return Err(RemoteError::Connect("connection refused".to_string()));
        }
        inner.sessions_opened += 1;
        Ok(SessionKey::new(format!("sess-{}", inner.sessions_opened)))
    }

    async fn release_session(&self, _key: &SessionKey) {
        let mut inner = self.inner.lock();
        inner.calls.push("release_session".to_string());
        inner.sessions_released += 1;
    }

    async fn list_surveys(&self, _key: &SessionKey) -> Result<Vec<String>, RemoteError> {
        let mut inner = self.inner.lock();
        inner.guard("list_surveys")?;
        Ok(inner.surveys.clone())
    }

    async fn get_participant(
        &self,
        _key: &SessionKey,
        survey_id: &str,
        token: &str,
    ) -> Result<Option<Participant>, RemoteError> {
        let mut inner = self.inner.lock();
        inner.guard("get_participant")?;
        Ok(inner.participants.get(&(survey_id.to_string(), token.to_string())).cloned())
    }

    async fn add_participant(
        &self,
        _key: &SessionKey,
        survey_id: &str,
        participant: &Participant,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.guard("add_participant")?;
        inner.next_tid += 1;
        let mut stored = participant.clone();
        stored.tid = inner.next_tid.to_string();
        // same-token replacement, as the production client guarantees
        inner.participants.insert((survey_id.to_string(), stored.token.clone()), stored);
        Ok(())
    }

    async fn set_participant(
        &self,
        _key: &SessionKey,
        survey_id: &str,
        tid: &str,
        properties: &std::collections::BTreeMap<String, String>,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.guard("set_participant")?;
        let found = inner
            .participants
            .iter_mut()
            .find(|((sid, _), p)| sid == survey_id && p.tid == tid);
        match found {
            Some((_, participant)) => {
                for (name, value) in properties {
                    match name.as_str() {
                        "validfrom" => participant.validfrom = Some(value.clone()),
                        "validuntil" => participant.validuntil = Some(value.clone()),
                        _ => {
                            participant.attributes.insert(name.clone(), value.clone());
                        }
                    }
                }
                Ok(())
            }
            None => Err(RemoteError::Status(format!("set_participant: no participant {}", tid))),
        }
    }

    async fn delete_participants(
        &self,
        _key: &SessionKey,
        survey_id: &str,
        tids: &[String],
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.guard("delete_participants")?;
        inner
            .participants
            .retain(|(sid, _), p| sid != survey_id || !tids.contains(&p.tid));
        Ok(())
    }

    async fn export_completed_by_token(
        &self,
        _key: &SessionKey,
        survey_id: &str,
        token: &str,
    ) -> Result<Vec<CompletedResponse>, RemoteError> {
        let mut inner = self.inner.lock();
        inner.guard("export_completed_by_token")?;
        Ok(inner
            .completed
            .get(&(survey_id.to_string(), token.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
