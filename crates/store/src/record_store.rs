// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed access to record field values.
//!
//! The engine never touches the record store's query machinery
//! directly; everything goes through this trait. Implementations are
//! expected to treat instance 1 and "no instance" as the same slot,
//! matching [`limesync_core::SurveyTarget`] normalization.

use async_trait::async_trait;
use limesync_core::{ProjectId, SurveyTarget};
use thiserror::Error;

/// Record store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing query or write failed.
    #[error("record store query failed: {0}")]
    Backend(String),
    /// The record's arm/event for a field cannot be resolved; fatal
    /// for code placement.
    #[error("cannot resolve the event of field '{field}' for record '{record}'")]
    EventResolution { record: String, field: String },
}

/// One stored value of a field: the slot it sits in plus the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub record: String,
    pub event: String,
    pub instance: Option<u32>,
    pub value: String,
}

impl FieldRow {
    /// The slot this row belongs to.
    pub fn target(&self) -> SurveyTarget {
        SurveyTarget::new(self.record.clone(), self.event.clone(), self.instance)
    }
}

/// A single pending field write; `None` deletes the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWrite {
    pub target: SurveyTarget,
    pub field: String,
    pub value: Option<String>,
}

/// Adapter over the record store's field-level query and update
/// primitives.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read one field value; `Ok(None)` when the field has no value in
    /// that slot.
    async fn get_field(
        &self,
        project: ProjectId,
        target: &SurveyTarget,
        field: &str,
    ) -> Result<Option<String>, StoreError>;

    /// First stored value of `field` for `record` regardless of event
    /// and instance. Used for record-level fields such as the code and
    /// the extra participant attributes.
    async fn get_record_field(
        &self,
        project: ProjectId,
        record: &str,
        field: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Write one field value; `None` or an empty string deletes it.
    async fn set_field(
        &self,
        project: ProjectId,
        target: &SurveyTarget,
        field: &str,
        value: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Apply several writes as one batch.
    async fn set_fields(&self, project: ProjectId, writes: &[FieldWrite])
        -> Result<(), StoreError>;

    /// Every stored row of `field` across the project's records.
    async fn field_rows(&self, project: ProjectId, field: &str)
        -> Result<Vec<FieldRow>, StoreError>;

    /// The event to which `field`'s instrument is bound within the
    /// record's arm; where a freshly generated code gets stored.
    async fn find_code_event(
        &self,
        project: ProjectId,
        record: &str,
        field: &str,
    ) -> Result<String, StoreError>;
}
