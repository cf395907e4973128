//! Team membership: a capacity-bounded, id-unique roster.

pub mod roster;

pub use roster::{add_to_team, remove_from_team, AddOutcome, Roster, TEAM_CAPACITY};
