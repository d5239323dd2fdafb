// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project and system configuration for the survey integration.

use crate::schema::{InstrumentBinding, InstrumentSchema};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minimum accepted number of code digits.
pub const MIN_CODE_DIGITS: u32 = 3;
/// Maximum accepted number of code digits; 10^19 is the largest power
/// of ten a u64 code range can hold.
pub const MAX_CODE_DIGITS: u32 = 19;
/// Number of code digits used when the setting is absent or out of
/// bounds.
pub const DEFAULT_CODE_DIGITS: u32 = 5;

/// Identifier of one record-store project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration problems; fatal to the current operation, never to
/// the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no code field configured")]
    MissingCodeField,
    #[error("instrument '{0}' is not connected to a survey")]
    UnknownInstrument(String),
    #[error("no survey id configured for instrument '{0}'")]
    MissingSurveyId(String),
    #[error("no token appendix configured for instrument at position {0}")]
    MissingAppendix(usize),
    #[error("the number of code digits must be a positive integer >= {MIN_CODE_DIGITS}")]
    DigitsTooLow,
    #[error("out of survey codes, increase the code digit count")]
    CodeSpaceExhausted,
}

/// Remote service account used for the session handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

/// Per-project settings.
///
/// `instruments`, `survey_ids` and `appendixes` are parallel lists;
/// [`ProjectConfig::binding`] resolves one position into an
/// [`InstrumentBinding`] and reports holes as configuration errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Field holding the record's survey code.
    pub code_field: String,
    /// Instrument names connected to remote surveys.
    pub instruments: Vec<String>,
    /// Remote survey id per instrument.
    pub survey_ids: Vec<String>,
    /// Token appendix per instrument.
    pub appendixes: Vec<String>,
    /// Record fields exported as numbered participant attributes;
    /// empty slots are skipped.
    #[serde(default)]
    pub attribute_fields: Vec<String>,
    /// Optional prefix prepended to generated codes.
    #[serde(default)]
    pub code_prefix: String,
    /// Number of digits drawn for new codes.
    #[serde(default)]
    pub code_digits: Option<u32>,
    pub credentials: Credentials,
}

impl ProjectConfig {
    /// Effective digit count: configured value when within bounds,
    /// otherwise the default.
    pub fn effective_code_digits(&self) -> u32 {
        match self.code_digits {
            Some(digits) if (MIN_CODE_DIGITS..=MAX_CODE_DIGITS).contains(&digits) => digits,
            _ => DEFAULT_CODE_DIGITS,
        }
    }

    /// Resolve an instrument name into its remote survey binding.
    pub fn binding(&self, instrument: &str) -> Result<InstrumentBinding, ConfigError> {
        let index = self
            .instruments
            .iter()
            .position(|name| name == instrument)
            .ok_or_else(|| ConfigError::UnknownInstrument(instrument.to_string()))?;
        let survey_id = self
            .survey_ids
            .get(index)
            .filter(|sid| !sid.is_empty())
            .ok_or_else(|| ConfigError::MissingSurveyId(instrument.to_string()))?;
        let appendix =
            self.appendixes.get(index).ok_or(ConfigError::MissingAppendix(index))?;
        Ok(InstrumentBinding {
            schema: InstrumentSchema::new(instrument),
            index,
            survey_id: survey_id.clone(),
            appendix: appendix.clone(),
        })
    }

    /// All resolvable bindings, built once per unit of work.
    pub fn bindings(&self) -> Vec<InstrumentBinding> {
        self.instruments.iter().filter_map(|name| self.binding(name).ok()).collect()
    }

    /// Trim stray whitespace and fill the digit default, as the
    /// configuration-save hook does before persisting.
    pub fn sanitize(&mut self) {
        trim_in_place(&mut self.code_field);
        trim_in_place(&mut self.code_prefix);
        trim_in_place(&mut self.credentials.user);
        trim_in_place(&mut self.credentials.pass);
        for list in [&mut self.instruments, &mut self.survey_ids, &mut self.appendixes] {
            for value in list.iter_mut() {
                trim_in_place(value);
            }
        }
        for value in self.attribute_fields.iter_mut() {
            trim_in_place(value);
        }
        if self.code_digits.is_none() {
            self.code_digits = Some(DEFAULT_CODE_DIGITS);
        }
    }
}

/// System-wide settings: where the remote service lives and how to
/// reach it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Remote service endpoint URL.
    pub service_url: String,
    /// Optional HTTP proxy URL.
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Proxy credentials as `user:pass`.
    #[serde(default)]
    pub proxy_auth: Option<String>,
}

impl SystemConfig {
    pub fn sanitize(&mut self) {
        trim_in_place(&mut self.service_url);
        if let Some(url) = self.proxy_url.as_mut() {
            trim_in_place(url);
        }
        if let Some(auth) = self.proxy_auth.as_mut() {
            trim_in_place(auth);
        }
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
