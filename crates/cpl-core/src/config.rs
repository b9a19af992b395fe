use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cpl_backend::InMemoryBackend;
use cpl_types::IndexHints;

use crate::error::{CplError, CplResult};
use crate::lineage::LineageOptions;

/// Engine configuration.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hop limit for lineage walks. Unbounded when absent.
    pub lineage_max_depth: Option<usize>,
    /// Sizing hints for identifier-keyed indexes.
    pub index: IndexHints,
    /// Settings for the built-in in-memory backend.
    pub memory_backend: MemoryBackendConfig,
}

/// Settings for [`InMemoryBackend`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryBackendConfig {
    /// Name reported in diagnostics.
    pub name: String,
}

impl Default for MemoryBackendConfig {
    fn default() -> Self {
        Self {
            name: "memory".into(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> CplResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| CplError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> CplResult<String> {
        toml::to_string(self).map_err(|e| CplError::Config(e.to_string()))
    }

    pub fn validate(&self) -> CplResult<()> {
        self.index
            .validate()
            .map_err(|e| CplError::Config(e.to_string()))?;
        if self.memory_backend.name.is_empty() {
            return Err(CplError::Config("memory_backend.name must not be empty".into()));
        }
        Ok(())
    }

    pub fn lineage_options(&self) -> LineageOptions {
        LineageOptions {
            max_depth: self.lineage_max_depth,
            hints: self.index,
        }
    }

    /// A fresh in-memory backend built from this configuration.
    pub fn build_memory_backend(&self) -> Arc<InMemoryBackend> {
        Arc::new(InMemoryBackend::with_hints(
            self.memory_backend.name.clone(),
            self.index,
        ))
    }
}
