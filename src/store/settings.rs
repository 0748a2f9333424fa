//! Key-value `app_settings` table and the badge definitions stored in it

use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::db::AdminDb;
use crate::Badge;
use crate::editor::BadgeSet;

/// Settings key holding the badge list
pub const BADGE_DEFINITIONS_KEY: &str = "badge_definitions";

/// Repository for opaque JSON settings blobs
pub struct SettingsRepository {
    db: AdminDb,
}

impl SettingsRepository {
    pub fn new(db: AdminDb) -> Self {
        Self { db }
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.db.conn();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM app_settings WHERE key = ?1",
                params![key],
                |r| r.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read setting {key}"))?;

        raw.map(|s| {
            serde_json::from_str(&s).with_context(|| format!("Setting {key} is not valid JSON"))
        })
        .transpose()
    }

    /// Replace the whole value under `key`
    pub fn set(&self, key: &str, value: &Value) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            r#"
            INSERT INTO app_settings (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value.to_string(), chrono::Utc::now().timestamp_millis()],
        )
        .with_context(|| format!("Failed to write setting {key}"))?;
        Ok(())
    }
}

/// Badge definitions, persisted as one JSON list
pub struct BadgeRepository {
    settings: SettingsRepository,
}

impl BadgeRepository {
    pub fn new(db: AdminDb) -> Self {
        Self {
            settings: SettingsRepository::new(db),
        }
    }

    /// Load all definitions.
    ///
    /// Entries that do not parse are carried along untouched so `save` writes
    /// them back.
    pub fn load(&self) -> Result<BadgeSet> {
        let entries = match self.settings.get(BADGE_DEFINITIONS_KEY)? {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                warn!("badge_definitions is not a list ({}), ignoring", json_kind(&other));
                Vec::new()
            }
            None => Vec::new(),
        };

        let mut badges = Vec::with_capacity(entries.len());
        let mut unparsed = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            match Badge::deserialize(&entry) {
                Ok(badge) => badges.push(badge),
                Err(e) => {
                    warn!("Keeping unreadable badge definition {} as is: {}", index, e);
                    unparsed.push(entry);
                }
            }
        }
        Ok(BadgeSet::new(badges).with_unparsed(unparsed))
    }

    /// Replace the stored list with `set`, unreadable entries included
    pub fn save(&self, set: &BadgeSet) -> Result<()> {
        let mut entries = Vec::with_capacity(set.len() + set.unparsed().len());
        for badge in set.badges() {
            entries.push(serde_json::to_value(badge).context("Failed to encode badge")?);
        }
        entries.extend(set.unparsed().iter().cloned());
        self.settings
            .set(BADGE_DEFINITIONS_KEY, &Value::Array(entries))?;
        info!(
            "Saved {} badge definitions ({} kept unread)",
            set.len(),
            set.unparsed().len()
        );
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::BadgeForm;

    #[test]
    fn test_settings_roundtrip() {
        let settings = SettingsRepository::new(AdminDb::open_in_memory().unwrap());
        assert!(settings.get("missing").unwrap().is_none());

        settings.set("theme", &serde_json::json!({"dark": true})).unwrap();
        settings.set("theme", &serde_json::json!({"dark": false})).unwrap();
        assert_eq!(
            settings.get("theme").unwrap(),
            Some(serde_json::json!({"dark": false}))
        );
    }

    #[test]
    fn test_badges_keep_broken_entries() {
        let db = AdminDb::open_in_memory().unwrap();
        SettingsRepository::new(db.clone())
            .set(
                BADGE_DEFINITIONS_KEY,
                &serde_json::json!([
                    {"badge_id": "a", "name": "A", "trigger_type": "challenge", "challenge_ids": ["1"]},
                    {"name": "no id"}
                ]),
            )
            .unwrap();

        let badges = BadgeRepository::new(db).load().unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges.badges()[0].id, "a");
        assert_eq!(badges.unparsed(), &[serde_json::json!({"name": "no id"})]);
    }

    #[test]
    fn test_unknown_action_badge_survives_unrelated_save() {
        let db = AdminDb::open_in_memory().unwrap();
        let settings = SettingsRepository::new(db.clone());
        let autumn = serde_json::json!({
            "badge_id": "autumn",
            "name": "Autumn",
            "trigger_type": "action",
            "action_trigger": {
                "type": "seasonal_autumn",
                "condition": "trigger_seasonal_autumn",
                "description": "Complete a challenge in autumn"
            }
        });
        settings
            .set(
                BADGE_DEFINITIONS_KEY,
                &serde_json::json!([
                    {"badge_id": "a", "name": "A", "trigger_type": "challenge", "challenge_ids": ["1"]},
                    autumn.clone()
                ]),
            )
            .unwrap();

        let repo = BadgeRepository::new(db);
        let (set, _) = repo
            .load()
            .unwrap()
            .create(BadgeForm::new("B").with_challenges(["2"]))
            .unwrap();
        repo.save(&set).unwrap();

        let stored = settings.get(BADGE_DEFINITIONS_KEY).unwrap().unwrap();
        let entries = stored.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&autumn));

        let reloaded = repo.load().unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.unparsed(), &[autumn]);
    }

    #[test]
    fn test_badges_save_replaces_list() {
        let repo = BadgeRepository::new(AdminDb::open_in_memory().unwrap());
        assert!(repo.load().unwrap().is_empty());

        let (set, _) = BadgeSet::default()
            .create(BadgeForm::new("Week One").with_challenges(["1"]))
            .unwrap();
        repo.save(&set).unwrap();
        repo.save(&set.delete("week_one").unwrap()).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }
}
