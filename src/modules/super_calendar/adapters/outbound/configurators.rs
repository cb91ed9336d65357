use crate::modules::super_calendar::core::configurator::Configurator;
use crate::shared::core::primitives::RecordId;
use async_trait::async_trait;

#[async_trait]
pub trait ConfiguratorRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Configurator>>;

    /// Insert, or replace the configurator with the same id together with its lines.
    async fn save(&self, configurator: Configurator) -> anyhow::Result<()>;

    /// Removes the configurator and its lines. `false` when it did not exist.
    async fn delete(&self, id: RecordId) -> anyhow::Result<bool>;
}
