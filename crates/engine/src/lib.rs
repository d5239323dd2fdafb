// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! limesync-engine: the survey-lifecycle reconciliation core
//!
//! Two triggers drive everything: a record-save notification
//! ([`UnitOfWork::handle_record_saved`]) and the periodic sweep
//! ([`ReconciliationScheduler::run_sweep`]). Both reconcile the state
//! fields kept in the record store against the participants the
//! remote survey service knows about.

pub mod code;
pub mod context;
pub mod error;
pub mod machine;
pub mod notify;
pub mod scheduler;
pub mod sweep;
pub mod validate;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use context::UnitOfWork;
pub use error::SyncError;
pub use notify::{AdminNotifier, LogOnlyNotifier};
pub use scheduler::{
    ProjectRegistry, ReconciliationScheduler, SweepReport, SweepStore, DEFAULT_SWEEP_INTERVAL,
    MAX_SWEEP_INTERVAL,
};
pub use validate::validate_project_settings;

#[cfg(any(test, feature = "test-support"))]
pub use test_support::{FakeNotifier, MemorySweepStore, StaticProjects};
