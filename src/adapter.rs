//! Mapping between the admin editing shape and the canonical `challenges` row
//!
//! The canonical row keeps numeric association ids in JSON integer arrays and
//! flattens the point schedule into one column per channel. Badge ids that are
//! not numeric survive in `associated_badge_slugs`; non-numeric reaction ids
//! have no home in the row and are dropped.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{Challenge, PointSchedule, ShopType, SubmissionTypes};

/// One row of the `challenges` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRow {
    pub challenge_id: String,
    pub title: String,
    pub description: String,
    pub tip: String,
    pub video_url: Option<String>,
    pub display_order: i64,
    pub points_earned: Option<i64>,
    pub image_points: Option<i64>,
    pub audio_points: Option<i64>,
    pub video_points: Option<i64>,
    pub shop_points: Option<i64>,
    pub badges: Vec<i64>,
    pub associated_badge_slugs: Vec<String>,
    pub reactions: Vec<i64>,
    pub parent_reactions: Vec<i64>,
    /// JSON object, or a string holding one
    pub submission_types: Option<Value>,
    pub shop_button_enabled: bool,
    pub shop_type: Option<String>,
    pub shop_product_id: Option<String>,
    pub shop_url: Option<String>,
    pub woocommerce_product_id: Option<String>,
    pub is_active: bool,
}

/// Parse an id whose decimal form round-trips exactly (`"7"` but not `"007"`)
pub fn numeric_id(id: &str) -> Option<i64> {
    let n: i64 = id.parse().ok()?;
    (n.to_string() == id).then_some(n)
}

fn split_ids(ids: &BTreeSet<String>) -> (Vec<i64>, Vec<String>) {
    let mut numeric = Vec::new();
    let mut other = Vec::new();
    for id in ids {
        match numeric_id(id) {
            Some(n) => numeric.push(n),
            None => other.push(id.clone()),
        }
    }
    (numeric, other)
}

fn numeric_only(challenge_id: &str, field: &str, ids: &BTreeSet<String>) -> Vec<i64> {
    let (numeric, dropped) = split_ids(ids);
    if !dropped.is_empty() {
        warn!(
            "Challenge {} has non-numeric {} ids, dropping: {:?}",
            challenge_id, field, dropped
        );
    }
    numeric
}

/// Admin shape to storage row
pub fn to_canonical(challenge: &Challenge) -> ChallengeRow {
    let (badges, associated_badge_slugs) = split_ids(&challenge.associated_badges);
    let types = challenge.enabled_submission_types;

    ChallengeRow {
        challenge_id: challenge.id.clone(),
        title: challenge.title.clone(),
        description: challenge.description.clone(),
        tip: challenge.tip.clone(),
        video_url: challenge.video_url.clone(),
        display_order: i64::from(challenge.day_order),
        points_earned: Some(i64::from(challenge.points.text)),
        image_points: Some(i64::from(challenge.points.image)),
        audio_points: Some(i64::from(challenge.points.audio)),
        video_points: Some(i64::from(challenge.points.video)),
        shop_points: Some(i64::from(challenge.points.shop)),
        badges,
        associated_badge_slugs,
        reactions: numeric_only(&challenge.id, "reaction", &challenge.associated_reactions),
        parent_reactions: numeric_only(
            &challenge.id,
            "parent reaction",
            &challenge.associated_parent_reactions,
        ),
        submission_types: Some(serde_json::json!({
            "text": types.text,
            "image": types.image,
            "audio": types.audio,
            "video": types.video,
        })),
        shop_button_enabled: challenge.show_shop_button,
        shop_type: Some(challenge.shop_type.as_str().to_string()),
        shop_product_id: challenge.shop_product_id.clone(),
        shop_url: challenge.shop_url.clone(),
        woocommerce_product_id: challenge.subscription_product_id.clone(),
        is_active: challenge.is_active,
    }
}

fn column_points(value: Option<i64>, fallback: u32) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(fallback)
}

/// Read the stored submission map; text defaults on, everything else off
pub fn parse_submission_types(value: Option<&Value>) -> SubmissionTypes {
    let parsed;
    let object = match value {
        Some(Value::Object(map)) => Some(map),
        Some(Value::String(raw)) => {
            parsed = serde_json::from_str::<Value>(raw).ok();
            parsed.as_ref().and_then(Value::as_object)
        }
        _ => None,
    };
    let flag = |name: &str| object.and_then(|m| m.get(name)).and_then(Value::as_bool);

    SubmissionTypes {
        text: flag("text") != Some(false),
        image: flag("image") == Some(true),
        audio: flag("audio") == Some(true),
        video: flag("video") == Some(true),
    }
}

/// Storage row to admin shape
pub fn from_canonical(row: &ChallengeRow) -> Challenge {
    let standard = PointSchedule::STANDARD;
    let points = PointSchedule {
        text: column_points(row.points_earned, standard.text),
        image: column_points(row.image_points, standard.image),
        audio: column_points(row.audio_points, standard.audio),
        video: column_points(row.video_points, standard.video),
        shop: column_points(row.shop_points, standard.shop),
    };

    let associated_badges = row
        .badges
        .iter()
        .map(i64::to_string)
        .chain(row.associated_badge_slugs.iter().cloned())
        .collect();

    let shop_type = row
        .shop_type
        .as_deref()
        .and_then(ShopType::from_str)
        .unwrap_or_default();

    Challenge {
        id: row.challenge_id.clone(),
        title: row.title.clone(),
        description: row.description.clone(),
        tip: row.tip.clone(),
        day_order: u32::try_from(row.display_order).unwrap_or(0),
        video_url: row.video_url.clone(),
        points,
        enabled_submission_types: parse_submission_types(row.submission_types.as_ref()),
        show_shop_button: row.shop_button_enabled,
        shop_type,
        shop_product_id: row.shop_product_id.clone(),
        shop_url: row.shop_url.clone(),
        subscription_product_id: row.woocommerce_product_id.clone(),
        associated_badges,
        associated_reactions: row.reactions.iter().map(i64::to_string).collect(),
        associated_parent_reactions: row.parent_reactions.iter().map(i64::to_string).collect(),
        is_active: row.is_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{ChallengeForm, ChallengeSet, EditorRules};

    fn challenge() -> Challenge {
        let form = ChallengeForm::new("Read together")
            .with_badges(["7", "007", "early_bird"])
            .with_video("https://youtu.be/dQw4w9WgXcQ");
        let (_, mut challenge) = ChallengeSet::default()
            .create(&form, &EditorRules::default())
            .unwrap();
        challenge.associated_reactions = ["1", "wave"].iter().map(|s| s.to_string()).collect();
        challenge.subscription_product_id = Some("812".to_string());
        challenge
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(numeric_id("7"), Some(7));
        assert_eq!(numeric_id("-3"), Some(-3));
        assert_eq!(numeric_id("007"), None);
        assert_eq!(numeric_id("+7"), None);
        assert_eq!(numeric_id("abc"), None);
        assert_eq!(numeric_id(""), None);
    }

    #[test]
    fn test_to_canonical_splits_ids() {
        let row = to_canonical(&challenge());
        assert_eq!(row.badges, vec![7]);
        assert_eq!(row.associated_badge_slugs, vec!["007", "early_bird"]);
        assert_eq!(row.reactions, vec![1]);
        assert_eq!(row.points_earned, Some(1));
        assert_eq!(row.video_points, Some(10));
        assert_eq!(row.woocommerce_product_id.as_deref(), Some("812"));
        assert_eq!(row.submission_types.as_ref().unwrap()["image"], false);
    }

    #[test]
    fn test_round_trip_restores_badges() {
        let original = challenge();
        let restored = from_canonical(&to_canonical(&original));
        assert_eq!(restored.associated_badges, original.associated_badges);
        assert_eq!(restored.points, original.points);
        assert_eq!(restored.subscription_product_id, original.subscription_product_id);
        // non-numeric reaction ids have no column
        assert_eq!(restored.associated_reactions.len(), 1);
    }

    #[test]
    fn test_from_canonical_defaults() {
        let mut row = to_canonical(&challenge());
        row.points_earned = None;
        row.image_points = Some(-4);
        row.audio_points = Some(8);
        row.submission_types = None;
        row.shop_type = Some("weird".to_string());
        row.shop_url = Some("  ".to_string());

        let restored = from_canonical(&row);
        assert_eq!(restored.points.text, 1);
        assert_eq!(restored.points.image, 3);
        assert_eq!(restored.points.audio, 8);
        assert_eq!(
            restored.enabled_submission_types,
            SubmissionTypes {
                text: true,
                image: false,
                audio: false,
                video: false,
            }
        );
        assert_eq!(restored.shop_type, ShopType::None);
        // blank strings are kept as stored
        assert_eq!(restored.shop_url.as_deref(), Some("  "));
    }

    #[test]
    fn test_submission_types_from_string() {
        let raw = Value::String(r#"{"text": false, "video": true}"#.to_string());
        let types = parse_submission_types(Some(&raw));
        assert!(!types.text);
        assert!(types.video);
        assert!(!types.audio);

        let garbage = Value::String("not json".to_string());
        assert!(parse_submission_types(Some(&garbage)).text);
    }

    #[test]
    fn test_disabled_channel_keeps_points() {
        let mut original = challenge();
        original.enabled_submission_types.image = false;
        original.points.image = 12;
        let row = to_canonical(&original);
        assert_eq!(row.image_points, Some(12));
        assert_eq!(from_canonical(&row).points.image, 12);
    }
}
