//! Folds a roster into per-affinity and per-class coverage counts.
//!
//! Each member resolves to a set of tags and every tag in that set gets
//! exactly one increment, so a member contributes to several buckets at once
//! and the totals measure tag coverage rather than a partition of the team.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::illuvial::Illuvial;
use crate::data::synergy_map::SynergyTable;
use crate::synergy::resolver::{CachedResolver, Resolve};

/// What to do with members whose display name has no synergy entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownPolicy {
    /// Contribute nothing to the count maps.
    #[default]
    Skip,
    /// Contribute the Unknown sentinel to both maps.
    Count,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub affinities: BTreeMap<String, u32>,
    pub classes: BTreeMap<String, u32>,
    pub members: usize,
    /// Display names of members without synergy data, in roster order.
    pub unresolved: Vec<String>,
}

impl Breakdown {
    pub fn is_empty(&self) -> bool {
        self.affinities.is_empty() && self.classes.is_empty()
    }

    pub fn affinity_count(&self, affinity: &str) -> u32 {
        self.affinities.get(affinity).copied().unwrap_or(0)
    }

    pub fn class_count(&self, class_name: &str) -> u32 {
        self.classes.get(class_name).copied().unwrap_or(0)
    }

    /// Highest count first, ties by name.
    pub fn ranked_affinities(&self) -> Vec<(&str, u32)> {
        ranked(&self.affinities)
    }

    pub fn ranked_classes(&self) -> Vec<(&str, u32)> {
        ranked(&self.classes)
    }
}

fn ranked(counts: &BTreeMap<String, u32>) -> Vec<(&str, u32)> {
    let mut pairs: Vec<(&str, u32)> = counts.iter().map(|(k, &v)| (k.as_str(), v)).collect();
    pairs.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(right.0)));
    pairs
}

fn bump<'a>(counts: &mut BTreeMap<String, u32>, tags: impl IntoIterator<Item = &'a String>) {
    for tag in tags {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
}

/// Resolve every member once and count each resolved tag once per member.
/// Results come through [Resolve::resolve_shared], so a memoizing resolver
/// hands back its cached sets instead of copies.
pub fn aggregate<'a, R>(
    roster: impl IntoIterator<Item = &'a Illuvial>,
    resolver: &R,
    policy: UnknownPolicy,
) -> Breakdown
where
    R: Resolve + ?Sized,
{
    roster
        .into_iter()
        .fold(Breakdown::default(), |mut acc, member| {
            acc.members += 1;
            let resolved = resolver.resolve_shared(&member.display_name);
            if resolved.is_unknown() {
                acc.unresolved.push(member.display_name.clone());
                if policy == UnknownPolicy::Skip {
                    return acc;
                }
            }
            bump(&mut acc.affinities, &resolved.affinities);
            bump(&mut acc.classes, &resolved.classes);
            acc
        })
}

/// Breakdown of a team against a synergy table with the default policy,
/// memoizing resolutions so repeated species resolve once.
pub fn team_breakdown(team: &[Illuvial], table: &SynergyTable) -> Breakdown {
    let resolver = CachedResolver::new(table);
    aggregate(team, &resolver, UnknownPolicy::Skip)
}
