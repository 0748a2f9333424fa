//! Challenge working set and its commands

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ordering::{self, OrderBase, Ordered};
use crate::{
    Challenge, EditError, PointSchedule, ShopType, SubmissionChannel, SubmissionTypes,
    ValidationError, youtube_video_id,
};

impl Ordered for Challenge {
    fn order_key(&self) -> String {
        self.id.clone()
    }

    fn order(&self) -> u32 {
        self.day_order
    }

    fn set_order(&mut self, order: u32) {
        self.day_order = order;
    }
}

/// Editor limits and defaults (see `[settings.challenges]` in config.toml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorRules {
    /// Highest day a user may pick; `None` leaves `day_order` unbounded
    #[serde(default)]
    pub max_day_order: Option<u32>,

    /// Points schedule for new challenges
    #[serde(default)]
    pub default_points: PointSchedule,

    /// Submission types for new challenges
    #[serde(default)]
    pub default_submission_types: SubmissionTypes,
}

impl Default for EditorRules {
    fn default() -> Self {
        Self {
            max_day_order: None,
            default_points: PointSchedule::STANDARD,
            default_submission_types: SubmissionTypes::default(),
        }
    }
}

/// Raw point values as typed into the form; `None` keeps the current/default value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsForm {
    #[serde(default)]
    pub text: Option<i64>,
    #[serde(default)]
    pub image: Option<i64>,
    #[serde(default)]
    pub audio: Option<i64>,
    #[serde(default)]
    pub video: Option<i64>,
    #[serde(default)]
    pub shop: Option<i64>,
}

impl PointsForm {
    pub fn get(&self, channel: SubmissionChannel) -> Option<i64> {
        match channel {
            SubmissionChannel::Text => self.text,
            SubmissionChannel::Image => self.image,
            SubmissionChannel::Audio => self.audio,
            SubmissionChannel::Video => self.video,
            SubmissionChannel::Shop => self.shop,
        }
    }

    pub fn set(&mut self, channel: SubmissionChannel, value: i64) {
        let slot = match channel {
            SubmissionChannel::Text => &mut self.text,
            SubmissionChannel::Image => &mut self.image,
            SubmissionChannel::Audio => &mut self.audio,
            SubmissionChannel::Video => &mut self.video,
            SubmissionChannel::Shop => &mut self.shop,
        };
        *slot = Some(value);
    }

    fn resolve(&self, fallback: PointSchedule) -> Result<PointSchedule, ValidationError> {
        let mut schedule = fallback;
        for channel in SubmissionChannel::all() {
            if let Some(value) = self.get(*channel) {
                let points = u32::try_from(value).map_err(|_| ValidationError::InvalidPoints {
                    channel: *channel,
                    value,
                })?;
                schedule.set(*channel, points);
            }
        }
        Ok(schedule)
    }
}

impl From<PointSchedule> for PointsForm {
    fn from(points: PointSchedule) -> Self {
        let mut form = Self::default();
        for channel in SubmissionChannel::all() {
            form.set(*channel, i64::from(points.get(*channel)));
        }
        form
    }
}

/// Create/edit form for a challenge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tip: String,
    /// Chosen day; `None` appends (create) or keeps the current day (update)
    #[serde(default)]
    pub day_order: Option<i64>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub points: PointsForm,
    #[serde(default)]
    pub enabled_submission_types: Option<SubmissionTypes>,
    #[serde(default)]
    pub show_shop_button: bool,
    #[serde(default)]
    pub shop_type: ShopType,
    #[serde(default)]
    pub shop_product_id: Option<String>,
    #[serde(default)]
    pub shop_url: Option<String>,
    #[serde(default)]
    pub subscription_product_id: Option<String>,
    #[serde(default)]
    pub associated_badges: BTreeSet<String>,
    #[serde(default)]
    pub associated_reactions: BTreeSet<String>,
    #[serde(default)]
    pub associated_parent_reactions: BTreeSet<String>,
}

impl ChallengeForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_day(mut self, day: i64) -> Self {
        self.day_order = Some(day);
        self
    }

    pub fn with_points(mut self, channel: SubmissionChannel, value: i64) -> Self {
        self.points.set(channel, value);
        self
    }

    pub fn with_video(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    pub fn with_badges<I, S>(mut self, badges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.associated_badges = badges.into_iter().map(Into::into).collect();
        self
    }

    /// Prefill from an existing record
    pub fn from_challenge(challenge: &Challenge) -> Self {
        Self {
            title: challenge.title.clone(),
            description: challenge.description.clone(),
            tip: challenge.tip.clone(),
            day_order: Some(i64::from(challenge.day_order)),
            video_url: challenge.video_url.clone(),
            points: PointsForm::from(challenge.points),
            enabled_submission_types: Some(challenge.enabled_submission_types),
            show_shop_button: challenge.show_shop_button,
            shop_type: challenge.shop_type,
            shop_product_id: challenge.shop_product_id.clone(),
            shop_url: challenge.shop_url.clone(),
            subscription_product_id: challenge.subscription_product_id.clone(),
            associated_badges: challenge.associated_badges.clone(),
            associated_reactions: challenge.associated_reactions.clone(),
            associated_parent_reactions: challenge.associated_parent_reactions.clone(),
        }
    }

    /// Validate and write the form's fields over `target`.
    ///
    /// Unset day/points/submission types keep whatever `target` already holds.
    fn apply_to(&self, target: &mut Challenge, rules: &EditorRules) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }

        let day_order = match self.day_order {
            Some(day) => {
                let day = u32::try_from(day)
                    .ok()
                    .filter(|d| *d >= 1)
                    .ok_or(ValidationError::InvalidDayOrder(day))?;
                if let Some(max) = rules.max_day_order
                    && day > max
                {
                    return Err(ValidationError::DayOutOfRange { day, max });
                }
                day
            }
            None => target.day_order,
        };

        let video_url = match self.video_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(url) => {
                if youtube_video_id(url).is_none() {
                    return Err(ValidationError::InvalidVideoUrl(url.to_string()));
                }
                Some(url.to_string())
            }
        };

        if self.show_shop_button && self.shop_type == ShopType::None {
            return Err(ValidationError::ShopButtonWithoutShop);
        }

        let points = self.points.resolve(target.points)?;

        target.title = self.title.clone();
        target.description = self.description.clone();
        target.tip = self.tip.clone();
        target.day_order = day_order;
        target.video_url = video_url;
        target.points = points;
        if let Some(types) = self.enabled_submission_types {
            target.enabled_submission_types = types;
        }
        target.show_shop_button = self.show_shop_button;
        target.shop_type = self.shop_type;
        target.shop_product_id = non_blank(&self.shop_product_id);
        target.shop_url = non_blank(&self.shop_url);
        target.subscription_product_id = non_blank(&self.subscription_product_id);
        target.associated_badges = self.associated_badges.clone();
        target.associated_reactions = self.associated_reactions.clone();
        target.associated_parent_reactions = self.associated_parent_reactions.clone();
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The active challenges, sorted by `day_order` (contiguous from 1)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeSet {
    challenges: Vec<Challenge>,
}

impl ChallengeSet {
    /// Build a working set from loaded records; inactive ones are left out
    pub fn new(challenges: impl IntoIterator<Item = Challenge>) -> Self {
        let mut challenges: Vec<Challenge> =
            challenges.into_iter().filter(|c| c.is_active).collect();
        ordering::normalize(&mut challenges, OrderBase::One);
        Self { challenges }
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    /// Challenge at a 1-based day
    pub fn by_day(&self, day: u32) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.day_order == day)
    }

    pub fn ids(&self) -> Vec<String> {
        self.challenges.iter().map(|c| c.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    fn require(&self, id: &str) -> Result<usize, EditError> {
        self.challenges
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| EditError::not_found("Challenge", id))
    }

    fn resorted(mut challenges: Vec<Challenge>) -> Self {
        ordering::normalize(&mut challenges, OrderBase::One);
        Self { challenges }
    }

    fn blank(&self, rules: &EditorRules) -> Challenge {
        Challenge {
            id: uuid::Uuid::new_v4().to_string(),
            title: String::new(),
            description: String::new(),
            tip: String::new(),
            day_order: self.challenges.len() as u32 + 1,
            video_url: None,
            points: rules.default_points,
            enabled_submission_types: rules.default_submission_types,
            show_shop_button: false,
            shop_type: ShopType::None,
            shop_product_id: None,
            shop_url: None,
            subscription_product_id: None,
            associated_badges: BTreeSet::new(),
            associated_reactions: BTreeSet::new(),
            associated_parent_reactions: BTreeSet::new(),
            is_active: true,
        }
    }

    /// Add a challenge with a fresh id.
    ///
    /// The new record is appended before the resort, so it lands after any
    /// existing challenge on the same day.
    pub fn create(
        &self,
        form: &ChallengeForm,
        rules: &EditorRules,
    ) -> Result<(Self, Challenge), EditError> {
        let mut challenge = self.blank(rules);
        form.apply_to(&mut challenge, rules)?;
        let id = challenge.id.clone();

        let mut challenges = self.challenges.clone();
        challenges.push(challenge);
        let next = Self::resorted(challenges);
        let created = next.get(&id).cloned().ok_or_else(|| EditError::not_found("Challenge", &id))?;
        Ok((next, created))
    }

    /// Replace every mutable field of `id`
    pub fn update(
        &self,
        id: &str,
        form: &ChallengeForm,
        rules: &EditorRules,
    ) -> Result<(Self, Challenge), EditError> {
        let index = self.require(id)?;
        let mut challenges = self.challenges.clone();
        form.apply_to(&mut challenges[index], rules)?;

        let next = Self::resorted(challenges);
        let updated = next.get(id).cloned().ok_or_else(|| EditError::not_found("Challenge", id))?;
        Ok((next, updated))
    }

    /// Remove `id` from the working set. Badges referencing it are left alone.
    pub fn delete(&self, id: &str) -> Result<Self, EditError> {
        let index = self.require(id)?;
        let mut challenges = self.challenges.clone();
        challenges.remove(index);
        Ok(Self::resorted(challenges))
    }

    /// Assign `day_order` by position in `ids`, which must list every challenge once
    pub fn reorder<S: AsRef<str>>(&self, ids: &[S]) -> Result<Self, EditError> {
        let challenges = ordering::apply_permutation(&self.challenges, ids, OrderBase::One)?;
        Ok(Self { challenges })
    }

    /// Drag the challenge at 0-based `from` to `to`
    pub fn move_item(&self, from: usize, to: usize) -> Result<Self, EditError> {
        let ids = ordering::move_ids(&self.challenges, from, to)?;
        self.reorder(&ids)
    }

    /// Create every form, or none of them
    pub fn import(
        &self,
        forms: &[ChallengeForm],
        rules: &EditorRules,
    ) -> Result<(Self, Vec<Challenge>), EditError> {
        let mut current = self.clone();
        let mut ids = Vec::with_capacity(forms.len());
        for (index, form) in forms.iter().enumerate() {
            let (next, created) = current.create(form, rules).map_err(|e| EditError::Import {
                index,
                source: Box::new(e),
            })?;
            ids.push(created.id);
            current = next;
        }

        let created = ids.iter().filter_map(|id| current.get(id).cloned()).collect();
        Ok((current, created))
    }

    /// Edit form prefilled from `id`
    pub fn to_form(&self, id: &str) -> Result<ChallengeForm, EditError> {
        let index = self.require(id)?;
        Ok(ChallengeForm::from_challenge(&self.challenges[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(n: usize) -> ChallengeSet {
        let rules = EditorRules::default();
        let mut set = ChallengeSet::default();
        for i in 1..=n {
            let (next, _) = set.create(&ChallengeForm::new(format!("Day {i}")), &rules).unwrap();
            set = next;
        }
        set
    }

    fn titles(set: &ChallengeSet) -> Vec<&str> {
        set.challenges().iter().map(|c| c.title.as_str()).collect()
    }

    fn days(set: &ChallengeSet) -> Vec<u32> {
        set.challenges().iter().map(|c| c.day_order).collect()
    }

    #[test]
    fn test_create_defaults() {
        let (set, created) = ChallengeSet::default()
            .create(&ChallengeForm::new("  Breakfast date "), &EditorRules::default())
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(created.title, "  Breakfast date ");
        assert_eq!(created.day_order, 1);
        assert_eq!(created.points, PointSchedule::STANDARD);
        assert_eq!(created.enabled_submission_types, SubmissionTypes::default());
        assert!(!created.id.is_empty());
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let set = set_of(5);
        let mut ids = set.ids();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_create_on_taken_day_lands_after_existing() {
        let set = set_of(4);
        let (set, created) = set
            .create(&ChallengeForm::new("New").with_day(3), &EditorRules::default())
            .unwrap();
        assert_eq!(days(&set), vec![1, 2, 3, 4, 5]);
        assert_eq!(created.day_order, 4);
        assert_eq!(titles(&set), vec!["Day 1", "Day 2", "Day 3", "New", "Day 4"]);
    }

    #[test]
    fn test_create_validation() {
        let rules = EditorRules {
            max_day_order: Some(7),
            ..EditorRules::default()
        };
        let set = ChallengeSet::default();

        let cases = vec![
            (ChallengeForm::new("   "), ValidationError::MissingField("title")),
            (
                ChallengeForm::new("x").with_points(SubmissionChannel::Audio, -1),
                ValidationError::InvalidPoints {
                    channel: SubmissionChannel::Audio,
                    value: -1,
                },
            ),
            (
                ChallengeForm::new("x").with_points(SubmissionChannel::Video, i64::from(u32::MAX) + 1),
                ValidationError::InvalidPoints {
                    channel: SubmissionChannel::Video,
                    value: i64::from(u32::MAX) + 1,
                },
            ),
            (ChallengeForm::new("x").with_day(0), ValidationError::InvalidDayOrder(0)),
            (
                ChallengeForm::new("x").with_day(8),
                ValidationError::DayOutOfRange { day: 8, max: 7 },
            ),
            (
                ChallengeForm::new("x").with_video("https://vimeo.com/1"),
                ValidationError::InvalidVideoUrl("https://vimeo.com/1".to_string()),
            ),
            (
                ChallengeForm {
                    show_shop_button: true,
                    ..ChallengeForm::new("x")
                },
                ValidationError::ShopButtonWithoutShop,
            ),
        ];

        for (form, expected) in cases {
            match set.create(&form, &rules) {
                Err(EditError::Validation(err)) => assert_eq!(err, expected),
                other => panic!("expected {expected:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_day_range_is_not_capped_by_default() {
        let (_, created) = set_of(2)
            .create(&ChallengeForm::new("Later").with_day(30), &EditorRules::default())
            .unwrap();
        assert_eq!(created.day_order, 3);
    }

    #[test]
    fn test_update_replaces_fields() {
        let set = set_of(3);
        let id = set.by_day(2).unwrap().id.clone();

        let mut form = set.to_form(&id).unwrap();
        form.title = "Renamed".to_string();
        form.points.set(SubmissionChannel::Video, 20);
        form.shop_type = ShopType::Product;
        form.show_shop_button = true;
        form.shop_product_id = Some("  ".to_string());

        let (next, updated) = set.update(&id, &form, &EditorRules::default()).unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.points.video, 20);
        assert_eq!(updated.day_order, 2);
        assert!(updated.shop_button_visible());
        assert_eq!(updated.shop_product_id, None);
        assert_eq!(days(&next), vec![1, 2, 3]);
        // the original snapshot is untouched
        assert_eq!(set.get(&id).unwrap().title, "Day 2");
    }

    #[test]
    fn test_update_unknown_id() {
        let err = set_of(1)
            .update("missing", &ChallengeForm::new("x"), &EditorRules::default())
            .unwrap_err();
        assert!(matches!(err, EditError::NotFound { kind: "Challenge", .. }));
    }

    #[test]
    fn test_delete_resorts() {
        let set = set_of(4);
        let id = set.by_day(2).unwrap().id.clone();
        let set = set.delete(&id).unwrap();
        assert_eq!(days(&set), vec![1, 2, 3]);
        assert_eq!(titles(&set), vec!["Day 1", "Day 3", "Day 4"]);
        assert!(matches!(set.delete(&id), Err(EditError::NotFound { .. })));
    }

    #[test]
    fn test_reorder_and_move() {
        let set = set_of(4);
        let mut ids = set.ids();
        ids.reverse();
        let reversed = set.reorder(&ids).unwrap();
        assert_eq!(titles(&reversed), vec!["Day 4", "Day 3", "Day 2", "Day 1"]);
        assert_eq!(days(&reversed), vec![1, 2, 3, 4]);

        let moved = set.move_item(0, 3).unwrap();
        assert_eq!(titles(&moved), vec!["Day 2", "Day 3", "Day 4", "Day 1"]);
        assert_eq!(days(&moved), vec![1, 2, 3, 4]);

        assert!(matches!(
            set.reorder(&ids[..2]),
            Err(EditError::InvalidPermutation(_))
        ));
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let set = set_of(2);
        let forms = vec![
            ChallengeForm::new("A"),
            ChallengeForm::new("B").with_points(SubmissionChannel::Text, -5),
        ];
        let err = set.import(&forms, &EditorRules::default()).unwrap_err();
        assert!(matches!(err, EditError::Import { index: 1, .. }));
        assert_eq!(set.len(), 2);

        let (next, created) = set
            .import(&forms[..1], &EditorRules::default())
            .unwrap();
        assert_eq!(next.len(), 3);
        assert_eq!(created[0].day_order, 3);
    }

    #[test]
    fn test_new_drops_inactive_and_normalizes() {
        let set = set_of(3);
        let mut records = set.challenges().to_vec();
        records[0].is_active = false;
        records[2].day_order = 10;
        let rebuilt = ChallengeSet::new(records);
        assert_eq!(titles(&rebuilt), vec!["Day 2", "Day 3"]);
        assert_eq!(days(&rebuilt), vec![1, 2]);
    }
}
