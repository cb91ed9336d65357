// In memory configurator repository.
//
// Purpose
// - Hold configurators and their lines without a database.
//
// Responsibilities
// - Keep configurators keyed by id. Lines live inside their configurator, so deleting one drops its lines.
// - Optionally slow down `list` so tests can overlap regeneration runs.

use crate::modules::super_calendar::adapters::outbound::configurators::ConfiguratorRepository;
use crate::modules::super_calendar::core::configurator::Configurator;
use crate::shared::core::primitives::RecordId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryConfigurators {
    configurators: RwLock<BTreeMap<RecordId, Configurator>>,
    delay_list_ms: AtomicU64,
    is_offline: bool,
}

impl InMemoryConfigurators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn set_delay_list_ms(&self, delay_ms: u64) {
        self.delay_list_ms.store(delay_ms, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Configurator repository offline"));
        }
        Ok(())
    }
}

impl From<Vec<Configurator>> for InMemoryConfigurators {
    fn from(configurators: Vec<Configurator>) -> Self {
        Self {
            configurators: RwLock::new(
                configurators
                    .into_iter()
                    .map(|configurator| (configurator.id, configurator))
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl ConfiguratorRepository for InMemoryConfigurators {
    async fn list(&self) -> anyhow::Result<Vec<Configurator>> {
        self.ensure_online()?;
        let delay_ms = self.delay_list_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        Ok(self.configurators.read().await.values().cloned().collect())
    }

    async fn save(&self, configurator: Configurator) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.configurators
            .write()
            .await
            .insert(configurator.id, configurator);
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> anyhow::Result<bool> {
        self.ensure_online()?;
        Ok(self.configurators.write().await.remove(&id).is_some())
    }
}
