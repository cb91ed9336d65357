use crate::shared::core::domain_filter::{DomainFilter, FilterError};
use crate::shared::core::primitives::{ModelDescriptor, SourceRecord, SourceRef};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Generic access to business records of any model.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Field metadata of a model.
    async fn model(&self, model: &str) -> Result<ModelDescriptor, StoreError>;

    /// Records of `model` matching `filter`, in storage order.
    async fn search(
        &self,
        model: &str,
        filter: &DomainFilter,
    ) -> Result<Vec<SourceRecord>, StoreError>;

    /// Follow a polymorphic reference back to its record.
    async fn resolve(&self, reference: &SourceRef) -> Result<Option<SourceRecord>, StoreError>;
}

pub mod in_memory;
