// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SurveyApi` over the LimeSurvey RemoteControl JSON-RPC methods.

use crate::api::{CompletedResponse, Participant, RemoteError, SessionKey, SurveyApi};
use crate::rpc::RpcClient;
use async_trait::async_trait;
use base64::Engine;
use limesync_core::Credentials;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Marker the service puts in the status of a participant lookup that
/// matched nothing. Not an error; the participant simply is not there.
const NOT_FOUND_STATUS: &str = "No results were found";

pub struct LimeClient {
    rpc: RpcClient,
}

impl LimeClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

/// A `status` member in an otherwise successful result carries the
/// service's application-level error.
fn status_of(result: &Value) -> Option<&str> {
    result.get("status").and_then(Value::as_str)
}

fn expect_no_status(call: &str, result: &Value) -> Result<(), RemoteError> {
    match status_of(result) {
        Some(status) => Err(RemoteError::Status(format!("{}: {}", call, status))),
        None => Ok(()),
    }
}

/// Survey ids arrive as numbers or strings depending on the service
/// version.
fn sid_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode the transport-encoded completed-response export: base64,
/// then JSON, then flatten the per-id maps under `responses` into
/// rows. Rows without the expected keys are dropped; they can never
/// match a record anyway.
pub(crate) fn decode_export(payload: &str) -> Result<Vec<CompletedResponse>, RemoteError> {
    let raw = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|err| RemoteError::Decode(format!("export is not base64: {}", err)))?;
    let body: Value = serde_json::from_slice(&raw)
        .map_err(|err| RemoteError::Decode(format!("export is not JSON: {}", err)))?;
    let mut rows = Vec::new();
    if let Some(responses) = body.get("responses").and_then(Value::as_array) {
        for entry in responses {
            if let Some(map) = entry.as_object() {
                for row in map.values() {
                    if let Ok(response) = serde_json::from_value::<CompletedResponse>(row.clone())
                    {
                        rows.push(response);
                    }
                }
            }
        }
    }
    Ok(rows)
}

#[async_trait]
impl SurveyApi for LimeClient {
    async fn open_session(&self, credentials: &Credentials) -> Result<SessionKey, RemoteError> {
        let params = json!([credentials.user, credentials.pass]);
        let result = self.rpc.call("get_session_key", params).await.map_err(|err| match err {
            RemoteError::Transport(inner) => RemoteError::Connect(inner.to_string()),
            other => other,
        })?;
        match result {
            // A bad login comes back as {"status": "..."} instead of a key.
            Value::String(key) => Ok(SessionKey::new(key)),
            other => match status_of(&other) {
                Some(status) => Err(RemoteError::Auth(status.to_string())),
                None => Err(RemoteError::Decode(format!("unexpected session key: {}", other))),
            },
        }
    }

    async fn release_session(&self, key: &SessionKey) {
        if let Err(err) = self.rpc.call("release_session_key", json!([key.as_str()])).await {
            debug!(error = %err, "releasing survey session failed");
        }
    }

    async fn list_surveys(&self, key: &SessionKey) -> Result<Vec<String>, RemoteError> {
        let result = self.rpc.call("list_surveys", json!([key.as_str()])).await?;
        expect_no_status("list_surveys", &result)?;
        let surveys = result
            .as_array()
            .ok_or_else(|| RemoteError::Decode("survey list is not an array".to_string()))?;
        Ok(surveys.iter().filter_map(|s| s.get("sid").and_then(sid_string)).collect())
    }

    async fn get_participant(
        &self,
        key: &SessionKey,
        survey_id: &str,
        token: &str,
    ) -> Result<Option<Participant>, RemoteError> {
        let params = json!([key.as_str(), survey_id, { "token": token }]);
        let result = self.rpc.call("get_participant_properties", params).await?;
        if let Some(status) = status_of(&result) {
            if status.contains(NOT_FOUND_STATUS) {
                return Ok(None);
            }
            return Err(RemoteError::Status(format!("get_participant: {}", status)));
        }
        let participant = serde_json::from_value(result)
            .map_err(|err| RemoteError::Decode(format!("participant: {}", err)))?;
        Ok(Some(participant))
    }

    async fn add_participant(
        &self,
        key: &SessionKey,
        survey_id: &str,
        participant: &Participant,
    ) -> Result<(), RemoteError> {
        // The service rejects duplicate tokens; clear any leftover
        // participant first so re-activation is idempotent.
        if let Some(existing) = self.get_participant(key, survey_id, &participant.token).await? {
            if !existing.tid.is_empty() {
                warn!(token = %participant.token, tid = %existing.tid,
                    "replacing leftover participant with the same token");
                self.delete_participants(key, survey_id, &[existing.tid]).await?;
            }
        }
        let params = json!([key.as_str(), survey_id, [participant], false]);
        let result = self.rpc.call("add_participants", params).await?;
        expect_no_status("add_participants", &result)?;
        if let Some(items) = result.as_array() {
            for item in items {
                if let Some(errors) = item.get("errors").filter(|e| !e.is_null()) {
                    return Err(RemoteError::Status(format!("add_participants: {}", errors)));
                }
            }
        }
        Ok(())
    }

    async fn set_participant(
        &self,
        key: &SessionKey,
        survey_id: &str,
        tid: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), RemoteError> {
        let params = json!([key.as_str(), survey_id, tid, properties]);
        let result = self.rpc.call("set_participant_properties", params).await?;
        expect_no_status("set_participant_properties", &result)
    }

    async fn delete_participants(
        &self,
        key: &SessionKey,
        survey_id: &str,
        tids: &[String],
    ) -> Result<(), RemoteError> {
        let params = json!([key.as_str(), survey_id, tids]);
        let result = self.rpc.call("delete_participants", params).await?;
        expect_no_status("delete_participants", &result)
    }

    async fn export_completed_by_token(
        &self,
        key: &SessionKey,
        survey_id: &str,
        token: &str,
    ) -> Result<Vec<CompletedResponse>, RemoteError> {
        let params = json!([key.as_str(), survey_id, "json", token, Value::Null, "complete"]);
        let result = self.rpc.call("export_responses_by_token", params).await?;
        match result {
            Value::String(payload) => decode_export(&payload),
            // Anything else means "no responses" (the service answers
            // a status object when the token has no submissions).
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
#[path = "lime_tests.rs"]
mod tests;
