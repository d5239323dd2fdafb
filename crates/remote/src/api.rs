// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed surface of the remote survey service.

use async_trait::async_trait;
use limesync_core::Credentials;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Remote service failures. All of these are transient from the
/// engine's point of view: the next save event or sweep retries.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("cannot connect to the survey service: {0}")]
    Connect(String),
    #[error("survey service rejected the credentials: {0}")]
    Auth(String),
    #[error("survey service returned an error: {0}")]
    Status(String),
    #[error("survey service transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cannot decode survey service response: {0}")]
    Decode(String),
}

/// Authenticated session handle issued by the service. Ephemeral;
/// valid for one unit of work and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The service's representation of one survey invitation.
///
/// `firstname` and `lastname` are repurposed: they carry the slot's
/// identity key (`event` or `event.instance`) and the record key, the
/// two values the engine needs to recognize its own participants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub tid: String,
    pub token: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub validfrom: Option<String>,
    #[serde(default)]
    pub validuntil: Option<String>,
    /// Numbered extra attributes (`attribute_1`, `attribute_2`, ...).
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

/// One row from the completed-response export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletedResponse {
    pub record: String,
    pub event: String,
    #[serde(default)]
    pub startdate: String,
    #[serde(default)]
    pub submitdate: String,
}

/// Operations the engine needs from the survey service.
#[async_trait]
pub trait SurveyApi: Send + Sync + 'static {
    /// Authenticate and obtain a session key.
    async fn open_session(&self, credentials: &Credentials) -> Result<SessionKey, RemoteError>;

    /// End a session. Best effort; failures are logged, not surfaced.
    async fn release_session(&self, key: &SessionKey);

    /// Ids of all surveys visible to the session's account.
    async fn list_surveys(&self, key: &SessionKey) -> Result<Vec<String>, RemoteError>;

    /// Look up a participant by token. A participant that does not
    /// exist is `Ok(None)`; any other status-bearing response is an
    /// error.
    async fn get_participant(
        &self,
        key: &SessionKey,
        survey_id: &str,
        token: &str,
    ) -> Result<Option<Participant>, RemoteError>;

    /// Create a participant. Implementations must first delete any
    /// existing participant with the same token, so the call never
    /// trips the service's duplicate-token rejection.
    async fn add_participant(
        &self,
        key: &SessionKey,
        survey_id: &str,
        participant: &Participant,
    ) -> Result<(), RemoteError>;

    /// Update properties of an existing participant.
    async fn set_participant(
        &self,
        key: &SessionKey,
        survey_id: &str,
        tid: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), RemoteError>;

    /// Delete participants by their service-side ids.
    async fn delete_participants(
        &self,
        key: &SessionKey,
        survey_id: &str,
        tids: &[String],
    ) -> Result<(), RemoteError>;

    /// Completed responses recorded under `token`, flattened into
    /// rows. No completed response yields an empty list.
    async fn export_completed_by_token(
        &self,
        key: &SessionKey,
        survey_id: &str,
        token: &str,
    ) -> Result<Vec<CompletedResponse>, RemoteError>;
}
