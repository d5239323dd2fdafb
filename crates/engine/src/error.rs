// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from one reconciliation unit of work.

use limesync_core::ConfigError;
use limesync_remote::RemoteError;
use limesync_store::StoreError;
use thiserror::Error;

/// Anything a transition or sweep pass can fail with.
///
/// Configuration and integrity problems are operator-facing;
/// remote-service failures are transient and retried implicitly by
/// the next save event or sweep. A consistency mismatch (participant
/// missing or owned by another slot) is not an error at all; it is a
/// state transition to EXPIRED.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("record store error: {0}")]
    Store(#[from] StoreError),
    #[error("remote service error: {0}")]
    Remote(#[from] RemoteError),
}
