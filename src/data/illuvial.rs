use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DataError, Result};

/// One catalog creature. Only `id`, `display_name`, `affinity` and `class_name`
/// feed the synergy core; the rest is carried for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Illuvial {
    pub id: String,
    pub display_name: String,
    pub line: String,
    pub stage: f64,
    pub tier: f64,
    pub affinity: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub max_health: f64,
    pub attack_physical: f64,
    pub attack_speed: f64,
    pub image: String,
}

/// Catalog entries after field-contract filtering, in file order.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub illuvials: Vec<Illuvial>,
    /// Number of source entries dropped for missing or wrongly typed fields.
    pub excluded: usize,
}

/// Accepts a bare array or `{ "illuvials": [...] }`.
pub(crate) fn catalog_entries<'a>(payload: &'a Value) -> Option<&'a Vec<Value>> {
    payload
        .get("illuvials")
        .and_then(Value::as_array)
        .or_else(|| payload.as_array())
}

/// Checks one raw entry against the record contract. Non-conforming entries
/// are not an error: they are simply not part of the catalog. A blank `id`
/// does not conform.
pub fn parse_illuvial(entry: &Value) -> Option<Illuvial> {
    serde_json::from_value::<Illuvial>(entry.clone())
        .ok()
        .filter(|illuvial| !illuvial.id.trim().is_empty())
}

pub fn parse_catalog(path: &str, raw: &str) -> Result<CatalogLoad> {
    let payload: Value = serde_json::from_str(raw).map_err(|source| DataError::Json {
        path: path.to_string(),
        source,
    })?;
    let entries = catalog_entries(&payload).ok_or_else(|| DataError::Shape {
        path: path.to_string(),
        message: "expected top-level JSON array or { illuvials: [...] }".to_string(),
    })?;

    let mut load = CatalogLoad::default();
    for (index, entry) in entries.iter().enumerate() {
        match parse_illuvial(entry) {
            Some(illuvial) => load.illuvials.push(illuvial),
            None => {
                tracing::debug!(path, index, "excluding catalog entry that fails the field contract");
                load.excluded += 1;
            }
        }
    }
    Ok(load)
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogLoad> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: shown.clone(),
        source,
    })?;
    let load = parse_catalog(&shown, &raw)?;
    tracing::info!(
        path = %shown,
        illuvials = load.illuvials.len(),
        excluded = load.excluded,
        "loaded illuvial catalog"
    );
    Ok(load)
}
