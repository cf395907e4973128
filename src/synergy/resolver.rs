//! Expands a creature key into its full, de-duplicated affinity and class tags.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexSet;
use serde::Serialize;

use crate::data::synergy_map::{SynergyEntry, SynergyTable};

/// Tag used for both affinity and class when a key has no synergy entry.
pub const UNKNOWN: &str = "Unknown";

/// Separator between tags in display labels.
pub const LABEL_SEPARATOR: &str = " + ";

/// Resolved tags for one creature. Sets keep insertion order: base tag first,
/// then composites in source order, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTypes {
    pub affinities: IndexSet<String>,
    pub classes: IndexSet<String>,
    pub found: bool,
}

impl ResolvedTypes {
    /// The fallback for keys absent from the synergy table.
    pub fn unknown() -> Self {
        Self {
            affinities: IndexSet::from([UNKNOWN.to_string()]),
            classes: IndexSet::from([UNKNOWN.to_string()]),
            found: false,
        }
    }

    pub fn from_entry(entry: &SynergyEntry) -> Self {
        Self {
            affinities: tag_set(&entry.base_affinity, &entry.composite_affinities),
            classes: tag_set(&entry.base_class, &entry.composite_classes),
            found: true,
        }
    }

    pub fn is_unknown(&self) -> bool {
        !self.found
    }

    pub fn label(&self) -> DisplayLabel {
        DisplayLabel {
            affinity_label: join_tags(&self.affinities),
            class_label: join_tags(&self.classes),
        }
    }
}

fn tag_set(base: &str, composites: &[String]) -> IndexSet<String> {
    std::iter::once(base)
        .chain(composites.iter().map(String::as_str))
        .map(str::to_string)
        .collect()
}

fn join_tags(tags: &IndexSet<String>) -> String {
    tags.iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

/// Human-readable tag strings, e.g. `"Water + Air"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLabel {
    pub affinity_label: String,
    pub class_label: String,
}

/// Anything that can expand a key into [ResolvedTypes].
pub trait Resolve {
    fn resolve(&self, key: &str) -> ResolvedTypes;

    /// Reference-counted result. Memoizing resolvers hand out their cached
    /// value here without copying the tag sets.
    fn resolve_shared(&self, key: &str) -> Rc<ResolvedTypes> {
        Rc::new(self.resolve(key))
    }

    fn display_label(&self, key: &str) -> DisplayLabel {
        self.resolve(key).label()
    }
}

impl Resolve for SynergyTable {
    fn resolve(&self, key: &str) -> ResolvedTypes {
        self.get(key)
            .map(ResolvedTypes::from_entry)
            .unwrap_or_else(ResolvedTypes::unknown)
    }
}

impl<R: Resolve + ?Sized> Resolve for &R {
    fn resolve(&self, key: &str) -> ResolvedTypes {
        (**self).resolve(key)
    }

    fn resolve_shared(&self, key: &str) -> Rc<ResolvedTypes> {
        (**self).resolve_shared(key)
    }
}

/// Memoizes another resolver per key. Inputs are immutable for the life of
/// the wrapper, so cached results never go stale.
#[derive(Debug)]
pub struct CachedResolver<R> {
    inner: R,
    cache: RefCell<HashMap<String, Rc<ResolvedTypes>>>,
}

impl<R: Resolve> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached_keys(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<R: Resolve> Resolve for CachedResolver<R> {
    fn resolve(&self, key: &str) -> ResolvedTypes {
        self.resolve_shared(key).as_ref().clone()
    }

    /// Computes on first use, then returns the cached handle.
    fn resolve_shared(&self, key: &str) -> Rc<ResolvedTypes> {
        if let Some(hit) = self.cache.borrow().get(key) {
            return Rc::clone(hit);
        }
        let resolved = self.inner.resolve_shared(key);
        self.cache
            .borrow_mut()
            .insert(key.to_string(), Rc::clone(&resolved));
        resolved
    }

    fn display_label(&self, key: &str) -> DisplayLabel {
        self.resolve_shared(key).label()
    }
}

/// Display label for a key against a synergy table.
pub fn display_label(table: &SynergyTable, key: &str) -> DisplayLabel {
    table.display_label(key)
}
