//! Synergy resolution and team aggregation.
//!
//! [resolver] expands one creature into its affinity/class tags; [breakdown]
//! folds a whole team into coverage counts on top of it.

pub mod breakdown;
pub mod export_csv;
pub mod resolver;

pub use breakdown::{aggregate, team_breakdown, Breakdown, UnknownPolicy};
pub use resolver::{
    display_label, CachedResolver, DisplayLabel, Resolve, ResolvedTypes, LABEL_SEPARATOR, UNKNOWN,
};
