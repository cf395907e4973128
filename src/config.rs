//! Runtime configuration read from the environment once at start-up.

use std::env;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CATALOG_PATH: &str = "data/illuvials.json";
pub const DEFAULT_SYNERGY_PATH: &str = "data/illuvial_synergy_map.json";

pub const BIND_ENV: &str = "ILLUVILYTICS_BIND";
pub const CATALOG_ENV: &str = "ILLUVILYTICS_CATALOG";
pub const SYNERGY_ENV: &str = "ILLUVILYTICS_SYNERGY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub catalog_path: String,
    pub synergy_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            synergy_path: DEFAULT_SYNERGY_PATH.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by any non-empty ILLUVILYTICS_* variable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            bind_addr: pick(BIND_ENV, DEFAULT_BIND_ADDR),
            catalog_path: pick(CATALOG_ENV, DEFAULT_CATALOG_PATH),
            synergy_path: pick(SYNERGY_ENV, DEFAULT_SYNERGY_PATH),
        }
    }
}
