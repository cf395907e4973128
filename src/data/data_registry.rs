//! Startup-loaded data cache (DataRegistry) for the CLI and server.
//! Load once, share via Arc; nothing in here is mutated after construction.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::AppConfig;
use crate::data::illuvial::{load_catalog, Illuvial};
use crate::data::synergy_map::{load_synergy_table, SynergyTable};
use crate::error::Result;

/// Where each dataset came from and how much of it survived filtering.
#[derive(Debug, Clone, Serialize)]
pub struct DataSetInfo {
    pub source: String,
    pub entries: usize,
    pub excluded: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataVersion {
    pub catalog: DataSetInfo,
    pub synergy: DataSetInfo,
    pub loaded_at: String,
}

/// Read-only registry of the catalog and synergy table.
#[derive(Debug)]
pub struct DataRegistry {
    catalog: Vec<Illuvial>,
    by_id: HashMap<String, usize>,
    synergy: SynergyTable,
    version: DataVersion,
}

impl DataRegistry {
    /// Catalog load failure returns Err; a missing synergy file leaves every
    /// creature resolving as Unknown.
    pub fn load(config: &AppConfig) -> Result<Arc<DataRegistry>> {
        let catalog = load_catalog(&config.catalog_path)?;

        let synergy = if Path::new(&config.synergy_path).exists() {
            load_synergy_table(&config.synergy_path)?
        } else {
            tracing::warn!(
                path = %config.synergy_path,
                "synergy table not found; all illuvials will resolve as Unknown"
            );
            SynergyTable::default()
        };

        let version = DataVersion {
            catalog: DataSetInfo {
                source: config.catalog_path.clone(),
                entries: catalog.illuvials.len(),
                excluded: catalog.excluded,
            },
            synergy: DataSetInfo {
                source: config.synergy_path.clone(),
                entries: synergy.len(),
                excluded: synergy.dropped(),
            },
            loaded_at: chrono::Utc::now().to_rfc3339(),
        };

        Ok(Arc::new(Self::build(catalog.illuvials, synergy, version)))
    }

    /// Registry from in-memory data (tests, benches, embedding callers).
    pub fn from_parts(catalog: Vec<Illuvial>, synergy: SynergyTable) -> DataRegistry {
        let version = DataVersion {
            catalog: DataSetInfo {
                source: "memory".to_string(),
                entries: catalog.len(),
                excluded: 0,
            },
            synergy: DataSetInfo {
                source: "memory".to_string(),
                entries: synergy.len(),
                excluded: synergy.dropped(),
            },
            loaded_at: chrono::Utc::now().to_rfc3339(),
        };
        Self::build(catalog, synergy, version)
    }

    fn build(catalog: Vec<Illuvial>, synergy: SynergyTable, version: DataVersion) -> DataRegistry {
        let mut by_id = HashMap::with_capacity(catalog.len());
        let mut unique = Vec::with_capacity(catalog.len());
        for illuvial in catalog {
            if by_id.contains_key(&illuvial.id) {
                tracing::debug!(id = %illuvial.id, "ignoring duplicate catalog id");
                continue;
            }
            by_id.insert(illuvial.id.clone(), unique.len());
            unique.push(illuvial);
        }
        DataRegistry {
            catalog: unique,
            by_id,
            synergy,
            version,
        }
    }

    /// Catalog in source order, first occurrence of each id.
    pub fn illuvials(&self) -> &[Illuvial] {
        &self.catalog
    }

    pub fn illuvial(&self, id: &str) -> Option<&Illuvial> {
        self.by_id.get(id).map(|&index| &self.catalog[index])
    }

    pub fn synergy(&self) -> &SynergyTable {
        &self.synergy
    }

    pub fn version(&self) -> &DataVersion {
        &self.version
    }
}

/// Convenience for callers that only have paths, e.g. the validate command.
pub fn load_registry_from(catalog_path: &str, synergy_path: &str) -> Result<Arc<DataRegistry>> {
    let config = AppConfig {
        catalog_path: catalog_path.to_string(),
        synergy_path: synergy_path.to_string(),
        ..AppConfig::default()
    };
    DataRegistry::load(&config)
}
