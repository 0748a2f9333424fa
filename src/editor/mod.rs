//! Editor commands over immutable working sets
//!
//! Each working set is a snapshot; commands validate their input, apply the
//! change to a copy, restore the ordering invariant and return the new snapshot.
//! Callers adopt the new snapshot only after it has been persisted, so a failed
//! write leaves the previous state untouched.

mod badges;
mod challenges;
mod plans;

pub use badges::{BadgeForm, BadgeSet, MAX_ICON_CHARS};
pub use challenges::{ChallengeForm, ChallengeSet, EditorRules, PointsForm};
pub use plans::{PlanCard, PlanSet};
