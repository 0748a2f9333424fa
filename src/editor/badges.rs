//! Badge working set and the badge form

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    ActionTrigger, ActionTriggerType, Badge, BadgeTrigger, EditError, TriggerType,
    ValidationError,
};

/// Longest icon accepted, counted in chars
pub const MAX_ICON_CHARS: usize = 8;

static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let slug = SLUG_SEPARATORS.replace_all(&lowered, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "badge".to_string()
    } else {
        slug.to_string()
    }
}

/// Create/edit form for a badge.
///
/// Holds both trigger branches so toggling the type in the UI is lossless
/// until the form is submitted; [`BadgeForm::set_trigger_type`] clears the
/// branch that was switched away from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BadgeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub trigger_type: TriggerType,
    #[serde(default)]
    pub challenge_ids: BTreeSet<String>,
    #[serde(default)]
    pub action_trigger: Option<ActionTrigger>,
}

impl BadgeForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_points(mut self, points: i64) -> Self {
        self.points = points;
        self
    }

    pub fn with_challenges<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.challenge_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Switch trigger type, discarding the other branch's fields
    pub fn set_trigger_type(mut self, trigger_type: TriggerType) -> Self {
        match trigger_type {
            TriggerType::Challenge => self.action_trigger = None,
            TriggerType::Action => self.challenge_ids.clear(),
        }
        self.trigger_type = trigger_type;
        self
    }

    /// Pick a catalog entry; condition and description come from the catalog
    pub fn select_action(self, action: ActionTriggerType) -> Self {
        let mut form = self.set_trigger_type(TriggerType::Action);
        form.action_trigger = Some(ActionTrigger::from_catalog(action));
        form
    }

    pub fn from_badge(badge: &Badge) -> Self {
        let form = Self {
            name: badge.name.clone(),
            description: badge.description.clone(),
            icon: badge.icon.clone(),
            points: i64::from(badge.points),
            ..Self::default()
        };
        match &badge.trigger {
            BadgeTrigger::Challenge { challenge_ids } => Self {
                challenge_ids: challenge_ids.clone(),
                ..form
            },
            BadgeTrigger::Action { action_trigger } => {
                form.select_action(action_trigger.trigger_type)
            }
        }
    }

    /// Validate the form and build the badge under `id`
    pub fn into_badge(self, id: impl Into<String>) -> Result<Badge, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }

        let points = u32::try_from(self.points)
            .map_err(|_| ValidationError::InvalidBadgePoints(self.points))?;

        let icon = self.icon.trim();
        let len = icon.chars().count();
        if len > MAX_ICON_CHARS {
            return Err(ValidationError::IconTooLong {
                len,
                max: MAX_ICON_CHARS,
            });
        }

        let trigger = match self.trigger_type {
            TriggerType::Challenge => {
                let challenge_ids: BTreeSet<String> = self
                    .challenge_ids
                    .iter()
                    .map(|id| id.trim())
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
                if challenge_ids.is_empty() {
                    return Err(ValidationError::EmptyChallengeTrigger);
                }
                BadgeTrigger::Challenge { challenge_ids }
            }
            TriggerType::Action => {
                let selected = self
                    .action_trigger
                    .ok_or(ValidationError::MissingActionTrigger)?;
                // stored condition/description are always re-derived from the catalog
                BadgeTrigger::Action {
                    action_trigger: ActionTrigger::from_catalog(selected.trigger_type),
                }
            }
        };

        Ok(Badge {
            id: id.into(),
            name: self.name,
            description: self.description,
            icon: icon.to_string(),
            points,
            trigger,
        })
    }
}

/// All badge definitions, in stored order
///
/// Stored entries this build cannot parse are kept verbatim in `unparsed` and
/// written back on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadgeSet {
    badges: Vec<Badge>,
    unparsed: Vec<Value>,
}

impl BadgeSet {
    pub fn new(badges: impl IntoIterator<Item = Badge>) -> Self {
        Self {
            badges: badges.into_iter().collect(),
            unparsed: Vec::new(),
        }
    }

    /// Attach stored entries that did not parse as [`Badge`]
    pub fn with_unparsed(mut self, entries: Vec<Value>) -> Self {
        self.unparsed = entries;
        self
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn unparsed(&self) -> &[Value] {
        &self.unparsed
    }

    fn with_badges(&self, badges: Vec<Badge>) -> Self {
        Self {
            badges,
            unparsed: self.unparsed.clone(),
        }
    }

    fn id_taken(&self, id: &str) -> bool {
        self.get(id).is_some()
            || self.unparsed.iter().any(|entry| {
                ["badge_id", "id"]
                    .iter()
                    .any(|field| entry.get(*field).and_then(Value::as_str) == Some(id))
            })
    }

    pub fn get(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    fn require(&self, id: &str) -> Result<usize, EditError> {
        self.badges
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| EditError::not_found("Badge", id))
    }

    /// Slug of `name` not yet taken by another badge
    pub fn fresh_id(&self, name: &str) -> String {
        let base = slugify(name);
        if !self.id_taken(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.id_taken(candidate))
            .unwrap_or(base)
    }

    pub fn create(&self, form: BadgeForm) -> Result<(Self, Badge), EditError> {
        let id = self.fresh_id(&form.name);
        let badge = form.into_badge(id)?;
        let mut badges = self.badges.clone();
        badges.push(badge.clone());
        Ok((self.with_badges(badges), badge))
    }

    /// Replace the definition of `id`, keeping its id and position
    pub fn update(&self, id: &str, form: BadgeForm) -> Result<(Self, Badge), EditError> {
        let index = self.require(id)?;
        let badge = form.into_badge(id)?;
        let mut badges = self.badges.clone();
        badges[index] = badge.clone();
        Ok((self.with_badges(badges), badge))
    }

    /// Remove `id`. Challenges that still list it keep the dangling reference.
    pub fn delete(&self, id: &str) -> Result<Self, EditError> {
        let index = self.require(id)?;
        let mut badges = self.badges.clone();
        badges.remove(index);
        Ok(self.with_badges(badges))
    }

    /// Action badges the award engine should grant for `condition`
    pub fn by_condition(&self, condition: &str) -> Vec<&Badge> {
        self.badges
            .iter()
            .filter(|b| b.action_trigger().is_some_and(|t| t.matches(condition)))
            .collect()
    }

    /// Challenge badges that require `challenge_id`
    pub fn referencing_challenge(&self, challenge_id: &str) -> Vec<&Badge> {
        self.badges
            .iter()
            .filter(|b| b.challenge_ids().is_some_and(|ids| ids.contains(challenge_id)))
            .collect()
    }

    pub fn to_form(&self, id: &str) -> Result<BadgeForm, EditError> {
        let index = self.require(id)?;
        Ok(BadgeForm::from_badge(&self.badges[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Early Bird!"), "early_bird");
        assert_eq!(slugify("  7-Day   Streak "), "7_day_streak");
        assert_eq!(slugify("🔥"), "badge");
    }

    #[test]
    fn test_set_trigger_type_clears_other_branch() {
        let form = BadgeForm::new("x")
            .with_challenges(["c1", "c2"])
            .set_trigger_type(TriggerType::Action);
        assert!(form.challenge_ids.is_empty());
        assert_eq!(form.trigger_type, TriggerType::Action);

        let form = form
            .select_action(ActionTriggerType::MentorBadge)
            .set_trigger_type(TriggerType::Challenge);
        assert!(form.action_trigger.is_none());
    }

    #[test]
    fn test_select_action_copies_catalog() {
        let form = BadgeForm::new("Streaker").select_action(ActionTriggerType::StreakMilestone);
        let badge = form.into_badge("streaker").unwrap();
        let trigger = badge.action_trigger().unwrap();
        assert_eq!(trigger.condition, "trigger_streak_milestone");
        assert_eq!(trigger.description, "Complete challenges on consecutive days");
    }

    #[test]
    fn test_into_badge_rederives_tampered_trigger() {
        let mut form = BadgeForm::new("x").select_action(ActionTriggerType::FirstPublicPost);
        if let Some(trigger) = form.action_trigger.as_mut() {
            trigger.condition = "something_else".to_string();
        }
        let badge = form.into_badge("x").unwrap();
        assert_eq!(
            badge.action_trigger().unwrap().condition,
            "trigger_first_public_post"
        );
    }

    #[test]
    fn test_into_badge_validation() {
        let cases = vec![
            (BadgeForm::new(" "), ValidationError::MissingField("name")),
            (
                BadgeForm::new("x"),
                ValidationError::EmptyChallengeTrigger,
            ),
            (
                BadgeForm::new("x").set_trigger_type(TriggerType::Action),
                ValidationError::MissingActionTrigger,
            ),
            (
                BadgeForm::new("x").with_challenges(["c1"]).with_icon("123456789"),
                ValidationError::IconTooLong { len: 9, max: 8 },
            ),
        ];
        for (form, expected) in cases {
            assert_eq!(form.into_badge("id").unwrap_err(), expected);
        }

        let err = BadgeForm::new("x")
            .with_challenges(["c1"])
            .with_points(-3)
            .into_badge("id")
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidBadgePoints(-3));

        let too_large = i64::from(u32::MAX) + 1;
        let err = BadgeForm::new("x")
            .with_challenges(["c1"])
            .with_points(too_large)
            .into_badge("id")
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidBadgePoints(too_large));
    }

    #[test]
    fn test_into_badge_keeps_text_as_typed() {
        let mut form = BadgeForm::new(" Week One ").with_challenges(["c1"]);
        form.description = "Finish  the first week\n".to_string();
        let badge = form.into_badge("week_one").unwrap();
        assert_eq!(badge.name, " Week One ");
        assert_eq!(badge.description, "Finish  the first week\n");
    }

    #[test]
    fn test_unparsed_entries_survive_edits() {
        let stored = serde_json::json!({
            "badge_id": "autumn",
            "name": "Autumn",
            "trigger_type": "action",
            "action_trigger": {"type": "seasonal_autumn", "condition": "trigger_seasonal_autumn", "description": ""}
        });
        let set = BadgeSet::default().with_unparsed(vec![stored.clone()]);

        let (set, created) = set
            .create(BadgeForm::new("Autumn").with_challenges(["c1"]))
            .unwrap();
        assert_eq!(created.id, "autumn_2");
        let set = set.delete("autumn_2").unwrap();
        assert_eq!(set.unparsed(), &[stored]);
    }

    #[test]
    fn test_create_update_delete() {
        let set = BadgeSet::default();
        let (set, first) = set
            .create(BadgeForm::new("Week One").with_challenges(["c1", "c2"]))
            .unwrap();
        let (set, second) = set
            .create(BadgeForm::new("Week One").with_challenges(["c3"]))
            .unwrap();
        assert_eq!(first.id, "week_one");
        assert_eq!(second.id, "week_one_2");

        let form = set.to_form("week_one").unwrap().with_points(25);
        let (set, updated) = set.update("week_one", form).unwrap();
        assert_eq!(updated.points, 25);
        assert_eq!(set.badges()[0].id, "week_one");

        let set = set.delete("week_one").unwrap();
        assert_eq!(set.len(), 1);
        assert!(matches!(
            set.delete("week_one"),
            Err(EditError::NotFound { kind: "Badge", .. })
        ));
    }

    #[test]
    fn test_lookups() {
        let (set, _) = BadgeSet::default()
            .create(BadgeForm::new("A").with_challenges(["c1"]))
            .unwrap();
        let (set, _) = set
            .create(BadgeForm::new("B").select_action(ActionTriggerType::MentorBadge))
            .unwrap();

        assert_eq!(set.referencing_challenge("c1").len(), 1);
        assert!(set.referencing_challenge("c9").is_empty());
        let granted = set.by_condition("trigger_mentor_badge");
        assert_eq!(granted.len(), 1);
        assert_eq!(granted[0].name, "B");
    }
}
