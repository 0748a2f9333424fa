//! Badge definitions and the action trigger catalog
//!
//! A badge is awarded either when a set of challenges is completed or when the
//! external award engine observes a named action. The engine matches on
//! `ActionTrigger::condition`, so the condition string is always derived from
//! the trigger type.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Discriminant of [`BadgeTrigger`], used by the editor form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    #[default]
    Challenge,
    Action,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Challenge => "challenge",
            Self::Action => "action",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "challenge" => Some(Self::Challenge),
            "action" => Some(Self::Action),
            _ => None,
        }
    }
}

/// Fixed catalog of action predicates understood by the award engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTriggerType {
    FirstPublicPost,
    PublicMediaPost,
    VideoContentCreator,
    MultiplePublicPosts,
    StreakMilestone,
    EngagementChampion,
    MentorBadge,
    ConsistencyAward,
    SeasonalSpring,
    SeasonalSummer,
    SeasonalFall,
    SeasonalWinter,
}

impl ActionTriggerType {
    /// Get the string ID used in stored definitions
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPublicPost => "first_public_post",
            Self::PublicMediaPost => "public_media_post",
            Self::VideoContentCreator => "video_content_creator",
            Self::MultiplePublicPosts => "multiple_public_posts",
            Self::StreakMilestone => "streak_milestone",
            Self::EngagementChampion => "engagement_champion",
            Self::MentorBadge => "mentor_badge",
            Self::ConsistencyAward => "consistency_award",
            Self::SeasonalSpring => "seasonal_spring",
            Self::SeasonalSummer => "seasonal_summer",
            Self::SeasonalFall => "seasonal_fall",
            Self::SeasonalWinter => "seasonal_winter",
        }
    }

    /// Parse from the stored string ID
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s.trim())
    }

    /// Catalog description shown to admins and copied into the trigger
    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstPublicPost => "Share your first challenge response publicly",
            Self::PublicMediaPost => "Share a public post that includes a photo, audio or video",
            Self::VideoContentCreator => "Share a public video response",
            Self::MultiplePublicPosts => "Share several challenge responses publicly",
            Self::StreakMilestone => "Complete challenges on consecutive days",
            Self::EngagementChampion => "React to and encourage other dads' posts",
            Self::MentorBadge => "Help another dad by commenting on their journey",
            Self::ConsistencyAward => "Keep completing challenges week after week",
            Self::SeasonalSpring => "Complete a challenge during the spring season",
            Self::SeasonalSummer => "Complete a challenge during the summer season",
            Self::SeasonalFall => "Complete a challenge during the fall season",
            Self::SeasonalWinter => "Complete a challenge during the winter season",
        }
    }

    /// Award engine lookup key
    pub fn condition(&self) -> String {
        format!("trigger_{}", self.as_str())
    }

    /// Get all catalog entries
    pub fn all() -> &'static [ActionTriggerType] {
        &[
            Self::FirstPublicPost,
            Self::PublicMediaPost,
            Self::VideoContentCreator,
            Self::MultiplePublicPosts,
            Self::StreakMilestone,
            Self::EngagementChampion,
            Self::MentorBadge,
            Self::ConsistencyAward,
            Self::SeasonalSpring,
            Self::SeasonalSummer,
            Self::SeasonalFall,
            Self::SeasonalWinter,
        ]
    }

    /// Closest catalog entry to a mistyped name, if any is reasonably close
    pub fn suggest(input: &str) -> Option<Self> {
        use strsim::jaro_winkler;

        const FUZZY_THRESHOLD: f64 = 0.8;

        let needle = input.trim().to_lowercase();
        Self::all()
            .iter()
            .map(|t| (*t, jaro_winkler(&needle, t.as_str())))
            .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(t, _)| t)
    }
}

impl ActionTriggerType {
    /// Parse a catalog name, failing with a validation error for unknown names
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_str(s).ok_or_else(|| ValidationError::UnknownActionTrigger(s.to_string()))
    }
}

/// Action predicate attached to an action-triggered badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTrigger {
    #[serde(rename = "type")]
    pub trigger_type: ActionTriggerType,
    pub condition: String,
    pub description: String,
}

impl ActionTrigger {
    /// Build the trigger exactly as the catalog defines it
    pub fn from_catalog(trigger_type: ActionTriggerType) -> Self {
        Self {
            trigger_type,
            condition: trigger_type.condition(),
            description: trigger_type.description().to_string(),
        }
    }

    pub fn matches(&self, condition: &str) -> bool {
        self.condition == condition
    }
}

/// How a badge is earned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger_type", rename_all = "snake_case")]
pub enum BadgeTrigger {
    Challenge { challenge_ids: BTreeSet<String> },
    Action { action_trigger: ActionTrigger },
}

impl BadgeTrigger {
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            Self::Challenge { .. } => TriggerType::Challenge,
            Self::Action { .. } => TriggerType::Action,
        }
    }
}

/// Achievement definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    #[serde(rename = "badge_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Short emoji string
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub points: u32,
    #[serde(flatten)]
    pub trigger: BadgeTrigger,
}

impl Badge {
    /// Challenges this badge requires, empty for action badges
    pub fn challenge_ids(&self) -> Option<&BTreeSet<String>> {
        match &self.trigger {
            BadgeTrigger::Challenge { challenge_ids } => Some(challenge_ids),
            BadgeTrigger::Action { .. } => None,
        }
    }

    pub fn action_trigger(&self) -> Option<&ActionTrigger> {
        match &self.trigger {
            BadgeTrigger::Action { action_trigger } => Some(action_trigger),
            BadgeTrigger::Challenge { .. } => None,
        }
    }
}
