// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Addressing for one instrument instance within a record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The (record, event, instance) slot an instrument's fields live in.
///
/// Instance 1 and "no instance" address the same slot: the record
/// store keeps the first instance of a repeating form without an
/// instance key. The constructor normalizes `Some(1)` to `None` so
/// slot equality holds everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurveyTarget {
    pub record: String,
    pub event: String,
    pub instance: Option<u32>,
}

impl SurveyTarget {
    pub fn new(record: impl Into<String>, event: impl Into<String>, instance: Option<u32>) -> Self {
        Self {
            record: record.into(),
            event: event.into(),
            instance: instance.filter(|i| *i != 1),
        }
    }

    /// The key mirrored into the remote participant's `firstname`,
    /// used to verify that a remote participant belongs to this slot:
    /// `event` for the first instance, `event.instance` otherwise.
    pub fn identity_key(&self) -> String {
        match self.instance {
            None => self.event.clone(),
            Some(n) => format!("{}.{}", self.event, n),
        }
    }
}

impl fmt::Display for SurveyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instance {
            None => write!(f, "{}.{}", self.record, self.event),
            Some(n) => write!(f, "{}.{}.{}", self.record, self.event, n),
        }
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
