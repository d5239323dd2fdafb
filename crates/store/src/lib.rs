// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! limesync-store: the record store boundary consumed by the engine

pub mod record_store;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use record_store::{FieldRow, FieldWrite, RecordStore, StoreError};

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryRecordStore;
