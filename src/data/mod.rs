pub mod data_registry;
pub mod illuvial;
pub mod synergy_map;
pub mod validate;
