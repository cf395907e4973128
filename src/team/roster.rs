use serde::Serialize;

use crate::data::data_registry::DataRegistry;
use crate::data::illuvial::Illuvial;

/// Maximum number of illuvials on a team.
pub const TEAM_CAPACITY: usize = 10;

/// Result of an add. Only `Added` changes the roster; the others are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    Full,
}

/// Ordered team, unique by id, at most [TEAM_CAPACITY] members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    members: Vec<Illuvial>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply [Roster::add] for each id found in the catalog; unknown ids are skipped.
    pub fn from_ids<'a>(registry: &DataRegistry, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut roster = Roster::new();
        for id in ids {
            match registry.illuvial(id) {
                Some(illuvial) => {
                    roster.add(illuvial.clone());
                }
                None => tracing::debug!(id, "skipping id not present in catalog"),
            }
        }
        roster
    }

    pub fn add(&mut self, illuvial: Illuvial) -> AddOutcome {
        if self.contains(&illuvial.id) {
            return AddOutcome::AlreadyPresent;
        }
        if self.is_full() {
            return AddOutcome::Full;
        }
        self.members.push(illuvial);
        AddOutcome::Added
    }

    /// Returns whether a member was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member.id != id);
        self.members.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|member| member.id == id)
    }

    pub fn members(&self) -> &[Illuvial] {
        &self.members
    }

    pub fn ids(&self) -> Vec<String> {
        self.members.iter().map(|member| member.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= TEAM_CAPACITY
    }

    /// Empty slots left, for rendering placeholders.
    pub fn open_slots(&self) -> usize {
        TEAM_CAPACITY.saturating_sub(self.members.len())
    }
}

/// UI-facing alias of [Roster::add].
pub fn add_to_team(team: &mut Roster, illuvial: Illuvial) -> AddOutcome {
    team.add(illuvial)
}

/// UI-facing alias of [Roster::remove].
pub fn remove_from_team(team: &mut Roster, id: &str) -> bool {
    team.remove(id)
}
