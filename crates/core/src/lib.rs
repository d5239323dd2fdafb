// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! limesync-core: domain types for the survey-lifecycle sync engine

pub mod clock;
pub mod config;
pub mod schema;
pub mod state;
pub mod target;
pub mod token;
pub mod window;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    ConfigError, Credentials, ProjectConfig, ProjectId, SystemConfig, DEFAULT_CODE_DIGITS,
    MAX_CODE_DIGITS, MIN_CODE_DIGITS,
};
pub use schema::{InstrumentBinding, InstrumentSchema};
pub use state::{SurveyState, FORM_COMPLETE};
pub use target::SurveyTarget;
pub use token::{build_token, Token};
pub use window::{format_datetime, parse_datetime, ValidityWindow, DATETIME_FORMAT};
