// In memory implementation of the RecordStore port.
//
// Purpose
// - Exercise the calendar projection without a database.
//
// Responsibilities
// - Keep model metadata and records per model.
// - Evaluate filters with the typed matcher, never with dynamic code.

use crate::shared::core::domain_filter::DomainFilter;
use crate::shared::core::primitives::{
    ModelDescriptor, RawRecordId, SourceRecord, SourceRef,
};
use crate::shared::infrastructure::record_store::{RecordStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTable {
    pub descriptor: ModelDescriptor,
    #[serde(default)]
    pub records: Vec<SourceRecord>,
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<BTreeMap<String, ModelTable>>,
    is_offline: bool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: Vec<ModelTable>) -> Self {
        tables
            .into_iter()
            .fold(Self::new(), |store, table| {
                store.with_model(table.descriptor, table.records)
            })
    }

    pub fn with_model(mut self, descriptor: ModelDescriptor, records: Vec<SourceRecord>) -> Self {
        self.tables.get_mut().insert(
            descriptor.model.clone(),
            ModelTable {
                descriptor,
                records,
            },
        );
        self
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn insert(&self, model: &str, record: SourceRecord) -> Result<(), StoreError> {
        let mut guard = self.tables.write().await;
        let table = guard
            .get_mut(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;
        table.records.push(record);
        Ok(())
    }

    pub async fn remove(&self, model: &str, id: &RawRecordId) -> Result<(), StoreError> {
        let mut guard = self.tables.write().await;
        let table = guard
            .get_mut(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;
        table.records.retain(|record| &record.id != id);
        Ok(())
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("Record store offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn model(&self, model: &str) -> Result<ModelDescriptor, StoreError> {
        self.ensure_online()?;
        self.tables
            .read()
            .await
            .get(model)
            .map(|table| table.descriptor.clone())
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))
    }

    async fn search(
        &self,
        model: &str,
        filter: &DomainFilter,
    ) -> Result<Vec<SourceRecord>, StoreError> {
        self.ensure_online()?;
        let guard = self.tables.read().await;
        let table = guard
            .get(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;

        let mut matching = Vec::new();
        for record in &table.records {
            if filter.matches(record)? {
                matching.push(record.clone());
            }
        }
        Ok(matching)
    }

    async fn resolve(&self, reference: &SourceRef) -> Result<Option<SourceRecord>, StoreError> {
        self.ensure_online()?;
        let guard = self.tables.read().await;
        let table = guard
            .get(&reference.model)
            .ok_or_else(|| StoreError::UnknownModel(reference.model.clone()))?;
        Ok(table
            .records
            .iter()
            .find(|record| record.id.base_id().ok() == Some(reference.id))
            .cloned())
    }
}
