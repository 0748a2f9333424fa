//! Read-side views over a loaded snapshot

use serde::Serialize;
use tracing::warn;

use crate::store::Snapshot;
use crate::{Badge, Challenge, Reaction, TriggerType};

/// A challenge with its associations resolved for display
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeView<'a> {
    pub challenge: &'a Challenge,
    pub badges: Vec<&'a Badge>,
    pub reactions: Vec<&'a Reaction>,
    pub parent_reactions: Vec<&'a Reaction>,
    /// Associated ids that resolve to nothing
    pub dangling: Vec<String>,
}

impl<'a> ChallengeView<'a> {
    pub fn resolve(challenge: &'a Challenge, snapshot: &'a Snapshot) -> Self {
        let badges: Vec<&Badge> = challenge
            .associated_badges
            .iter()
            .filter_map(|id| snapshot.badges.get(id))
            .collect();

        let mut dangling: Vec<String> = challenge
            .associated_badges
            .iter()
            .filter(|id| snapshot.badges.get(id).is_none())
            .map(|id| format!("badge:{id}"))
            .collect();
        dangling.extend(
            snapshot
                .reactions
                .dangling(&challenge.associated_reactions)
                .into_iter()
                .map(|id| format!("reaction:{id}")),
        );
        dangling.extend(
            snapshot
                .parent_reactions
                .dangling(&challenge.associated_parent_reactions)
                .into_iter()
                .map(|id| format!("parent_reaction:{id}")),
        );
        if !dangling.is_empty() {
            warn!(
                "Challenge {} has dangling references: {}",
                challenge.id,
                dangling.join(", ")
            );
        }

        Self {
            challenge,
            badges,
            reactions: snapshot.reactions.resolve(&challenge.associated_reactions),
            parent_reactions: snapshot
                .parent_reactions
                .resolve(&challenge.associated_parent_reactions),
            dangling,
        }
    }
}

/// Headline counts for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub challenges: usize,
    pub public_challenges: usize,
    pub badges: usize,
    pub challenge_badges: usize,
    pub action_badges: usize,
    pub plans: usize,
    pub visible_plans: usize,
    pub dangling_references: usize,
}

impl DashboardSummary {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let challenges = snapshot.challenges.challenges();
        let badges = snapshot.badges.badges();
        let count_trigger = |t: TriggerType| {
            badges
                .iter()
                .filter(|b| b.trigger.trigger_type() == t)
                .count()
        };

        Self {
            challenges: challenges.len(),
            public_challenges: challenges.iter().filter(|c| c.is_public()).count(),
            badges: badges.len(),
            challenge_badges: count_trigger(TriggerType::Challenge),
            action_badges: count_trigger(TriggerType::Action),
            plans: snapshot.plans.len(),
            visible_plans: snapshot
                .plans
                .configs()
                .iter()
                .filter(|p| p.show_on_plans_page)
                .count(),
            dangling_references: challenges
                .iter()
                .map(|c| ChallengeView::resolve(c, snapshot).dangling.len())
                .sum(),
        }
    }
}
