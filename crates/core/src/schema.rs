// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-instrument field schema and remote survey bindings.

/// Field names derived from an instrument name.
///
/// Every connected instrument carries six bookkeeping fields named
/// `<instrument>_state`, `<instrument>_validfrom` and so on. The names
/// are derived once here instead of concatenated at every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentSchema {
    pub instrument: String,
    pub state: String,
    pub validfrom: String,
    pub validuntil: String,
    pub startdate: String,
    pub submitdate: String,
    pub complete: String,
}

impl InstrumentSchema {
    pub fn new(instrument: &str) -> Self {
        Self {
            instrument: instrument.to_string(),
            state: format!("{}_state", instrument),
            validfrom: format!("{}_validfrom", instrument),
            validuntil: format!("{}_validuntil", instrument),
            startdate: format!("{}_startdate", instrument),
            submitdate: format!("{}_submitdate", instrument),
            complete: format!("{}_complete", instrument),
        }
    }
}

/// One instrument's binding to a remote survey, resolved from the
/// project's parallel configuration lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentBinding {
    pub schema: InstrumentSchema,
    /// Position in the project's instrument list; selects the token
    /// appendix and survey id.
    pub index: usize,
    pub survey_id: String,
    pub appendix: String,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
