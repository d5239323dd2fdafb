// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory record store for tests and embedding.

use crate::record_store::{FieldRow, FieldWrite, RecordStore, StoreError};
use async_trait::async_trait;
use limesync_core::{ProjectId, SurveyTarget};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    record: String,
    event: String,
    instance: Option<u32>,
    field: String,
    value: String,
}

impl Row {
    fn matches(&self, target: &SurveyTarget, field: &str) -> bool {
        self.record == target.record
            && self.event == target.event
            && self.instance == target.instance
            && self.field == field
    }
}

#[derive(Default)]
struct Inner {
    rows: HashMap<ProjectId, Vec<Row>>,
    /// Event a generated code gets stored under, per project.
    code_events: HashMap<ProjectId, String>,
}

/// `RecordStore` over plain maps. Insertion order is preserved, so
/// `get_record_field` returns the first value written, like the real
/// store returns the first matching row.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the event that `find_code_event` resolves to for this
    /// project.
    pub fn bind_code_event(&self, project: ProjectId, event: &str) {
        self.inner.lock().code_events.insert(project, event.to_string());
    }

    /// Test convenience: read a field without going through the trait.
    pub fn value(&self, project: ProjectId, target: &SurveyTarget, field: &str) -> Option<String> {
        let inner = self.inner.lock();
        inner
            .rows
            .get(&project)?
            .iter()
            .find(|row| row.matches(target, field))
            .map(|row| row.value.clone())
    }

    fn write(inner: &mut Inner, project: ProjectId, write: &FieldWrite) {
        let rows = inner.rows.entry(project).or_default();
        let value = write.value.as_deref().filter(|v| !v.is_empty());
        match value {
            None => rows.retain(|row| !row.matches(&write.target, &write.field)),
            Some(value) => {
                if let Some(row) = rows.iter_mut().find(|row| row.matches(&write.target, &write.field))
                {
                    row.value = value.to_string();
                } else {
                    rows.push(Row {
                        record: write.target.record.clone(),
                        event: write.target.event.clone(),
                        instance: write.target.instance,
                        field: write.field.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_field(
        &self,
        project: ProjectId,
        target: &SurveyTarget,
        field: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.value(project, target, field))
    }

    async fn get_record_field(
        &self,
        project: ProjectId,
        record: &str,
        field: &str,
    ) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .rows
            .get(&project)
            .and_then(|rows| {
                rows.iter().find(|row| row.record == record && row.field == field)
            })
            .map(|row| row.value.clone()))
    }

    async fn set_field(
        &self,
        project: ProjectId,
        target: &SurveyTarget,
        field: &str,
        value: Option<&str>,
    ) -> Result<(), StoreError> {
        let write = FieldWrite {
            target: target.clone(),
            field: field.to_string(),
            value: value.map(str::to_string),
        };
        Self::write(&mut self.inner.lock(), project, &write);
        Ok(())
    }

    async fn set_fields(
        &self,
        project: ProjectId,
        writes: &[FieldWrite],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        for write in writes {
            Self::write(&mut inner, project, write);
        }
        Ok(())
    }

    async fn field_rows(
        &self,
        project: ProjectId,
        field: &str,
    ) -> Result<Vec<FieldRow>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .rows
            .get(&project)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.field == field)
                    .map(|row| FieldRow {
                        record: row.record.clone(),
                        event: row.event.clone(),
                        instance: row.instance,
                        value: row.value.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_code_event(
        &self,
        project: ProjectId,
        record: &str,
        field: &str,
    ) -> Result<String, StoreError> {
        self.inner.lock().code_events.get(&project).cloned().ok_or_else(|| {
            StoreError::EventResolution { record: record.to_string(), field: field.to_string() }
        })
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
