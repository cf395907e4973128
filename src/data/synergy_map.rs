//! Synergy lookup table: display name -> base and composite affinity/class tags.
//! Loaded from JSON (`{ "Name": { ... } }`) or an equivalent YAML mapping.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyEntry {
    pub base_affinity: String,
    pub base_class: String,
    #[serde(default)]
    pub composite_affinities: Vec<String>,
    #[serde(default)]
    pub composite_classes: Vec<String>,
}

impl SynergyEntry {
    fn has_base_tags(&self) -> bool {
        !self.base_affinity.trim().is_empty() && !self.base_class.trim().is_empty()
    }
}

/// Read-only table keyed by exact display name.
#[derive(Debug, Clone, Default)]
pub struct SynergyTable {
    entries: HashMap<String, SynergyEntry>,
    /// Source entries dropped as malformed (wrong shape or empty base tags).
    dropped: usize,
}

impl SynergyTable {
    /// Build from already-typed entries, keeping only those with both base tags.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, SynergyEntry)>) -> Self {
        let mut table = SynergyTable::default();
        for (name, entry) in entries {
            table.insert_checked(name, entry);
        }
        table
    }

    fn insert_checked(&mut self, name: String, entry: SynergyEntry) {
        if entry.has_base_tags() {
            self.entries.insert(name, entry);
        } else {
            tracing::debug!(name = %name, "dropping synergy entry with empty base tags");
            self.dropped += 1;
        }
    }

    fn from_raw<V, E>(raw: HashMap<String, V>, convert: impl Fn(V) -> std::result::Result<SynergyEntry, E>) -> Self
    where
        E: std::fmt::Display,
    {
        let mut table = SynergyTable::default();
        for (name, value) in raw {
            match convert(value) {
                Ok(entry) => table.insert_checked(name, entry),
                Err(err) => {
                    tracing::debug!(name = %name, error = %err, "dropping malformed synergy entry");
                    table.dropped += 1;
                }
            }
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&SynergyEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

fn is_yaml_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

pub fn parse_synergy_json(path: &str, raw: &str) -> Result<SynergyTable> {
    let map: HashMap<String, serde_json::Value> =
        serde_json::from_str(raw).map_err(|source| DataError::Json {
            path: path.to_string(),
            source,
        })?;
    Ok(SynergyTable::from_raw(map, serde_json::from_value))
}

pub fn parse_synergy_yaml(path: &str, raw: &str) -> Result<SynergyTable> {
    let map: HashMap<String, serde_yaml::Value> =
        serde_yaml::from_str(raw).map_err(|source| DataError::Yaml {
            path: path.to_string(),
            source,
        })?;
    Ok(SynergyTable::from_raw(map, serde_yaml::from_value))
}

pub fn load_synergy_table(path: impl AsRef<Path>) -> Result<SynergyTable> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: shown.clone(),
        source,
    })?;
    let table = if is_yaml_path(&shown) {
        parse_synergy_yaml(&shown, &raw)?
    } else {
        parse_synergy_json(&shown, &raw)?
    };
    tracing::info!(
        path = %shown,
        entries = table.len(),
        dropped = table.dropped(),
        "loaded synergy table"
    );
    Ok(table)
}
