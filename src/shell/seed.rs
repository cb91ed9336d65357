// JSON seed for the in memory adapters.
//
// Shape
// - `models`: model descriptors with their records.
// - `configurators`: configurators with their mapping lines.

use crate::modules::super_calendar::core::configurator::Configurator;
use crate::shared::infrastructure::record_store::in_memory::ModelTable;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub models: Vec<ModelTable>,
    #[serde(default)]
    pub configurators: Vec<Configurator>,
}

impl Seed {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("seed is not valid JSON")
    }
}

pub fn load_seed(path: &Path) -> anyhow::Result<Seed> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed {}", path.display()))?;
    Seed::parse(&raw).with_context(|| format!("parsing seed {}", path.display()))
}
