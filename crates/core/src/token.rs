// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token derivation from a record's survey code.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The remote join key for one (record, instrument): the record's code
/// followed by the instrument's configured appendix. Derived, never
/// stored; rebuilding it from the same inputs always yields the same
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the token for the instrument at `index` in the project's
/// instrument list. A missing appendix slot is a configuration error.
pub fn build_token(code: &str, index: usize, appendixes: &[String]) -> Result<Token, ConfigError> {
    let appendix = appendixes.get(index).ok_or(ConfigError::MissingAppendix(index))?;
    Ok(Token(format!("{}{}", code, appendix)))
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
