//! Challenge persistence

use std::collections::HashSet;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use super::BatchWriteError;
use super::db::AdminDb;
use crate::Challenge;
use crate::adapter::{ChallengeRow, from_canonical, to_canonical};
use crate::editor::ChallengeSet;

const TABLE: &str = "challenges";

const SELECT_COLUMNS: &str = r#"
    challenge_id, title, description, tip, video_url, display_order,
    points_earned, image_points, audio_points, video_points, shop_points,
    badges, associated_badge_slugs, reactions, parent_reactions, submission_types,
    shop_button_enabled, shop_type, shop_product_id, shop_url, woocommerce_product_id,
    is_active
"#;

fn json_ids<T: serde::Serialize>(ids: &[T]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

fn parse_ids<T: serde::de::DeserializeOwned>(raw: Option<String>) -> Vec<T> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChallengeRow> {
    Ok(ChallengeRow {
        challenge_id: row.get(0)?,
        title: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        tip: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        video_url: row.get(4)?,
        display_order: row.get(5)?,
        points_earned: row.get(6)?,
        image_points: row.get(7)?,
        audio_points: row.get(8)?,
        video_points: row.get(9)?,
        shop_points: row.get(10)?,
        badges: parse_ids(row.get(11)?),
        associated_badge_slugs: parse_ids(row.get(12)?),
        reactions: parse_ids(row.get(13)?),
        parent_reactions: parse_ids(row.get(14)?),
        submission_types: row
            .get::<_, Option<String>>(15)?
            .and_then(|s| serde_json::from_str(&s).ok()),
        shop_button_enabled: row.get(16)?,
        shop_type: row.get(17)?,
        shop_product_id: row.get(18)?,
        shop_url: row.get(19)?,
        woocommerce_product_id: row.get(20)?,
        is_active: row.get(21)?,
    })
}

fn upsert_row(conn: &Connection, row: &ChallengeRow, now: i64) -> rusqlite::Result<()> {
    conn.execute(
        r#"
        INSERT INTO challenges (
            challenge_id, title, description, tip, video_url, display_order,
            points_earned, image_points, audio_points, video_points, shop_points,
            badges, associated_badge_slugs, reactions, parent_reactions, submission_types,
            shop_button_enabled, shop_type, shop_product_id, shop_url, woocommerce_product_id,
            is_active, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)
        ON CONFLICT(challenge_id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            tip = excluded.tip,
            video_url = excluded.video_url,
            display_order = excluded.display_order,
            points_earned = excluded.points_earned,
            image_points = excluded.image_points,
            audio_points = excluded.audio_points,
            video_points = excluded.video_points,
            shop_points = excluded.shop_points,
            badges = excluded.badges,
            associated_badge_slugs = excluded.associated_badge_slugs,
            reactions = excluded.reactions,
            parent_reactions = excluded.parent_reactions,
            submission_types = excluded.submission_types,
            shop_button_enabled = excluded.shop_button_enabled,
            shop_type = excluded.shop_type,
            shop_product_id = excluded.shop_product_id,
            shop_url = excluded.shop_url,
            woocommerce_product_id = excluded.woocommerce_product_id,
            is_active = excluded.is_active,
            updated_at = excluded.updated_at
        "#,
        params![
            row.challenge_id,
            row.title,
            row.description,
            row.tip,
            row.video_url,
            row.display_order,
            row.points_earned,
            row.image_points,
            row.audio_points,
            row.video_points,
            row.shop_points,
            json_ids(&row.badges),
            json_ids(&row.associated_badge_slugs),
            json_ids(&row.reactions),
            json_ids(&row.parent_reactions),
            row.submission_types.as_ref().map(|v| v.to_string()),
            row.shop_button_enabled,
            row.shop_type,
            row.shop_product_id,
            row.shop_url,
            row.woocommerce_product_id,
            row.is_active,
            now,
        ],
    )?;
    Ok(())
}

/// Repository for the `challenges` table
pub struct ChallengeRepository {
    db: AdminDb,
}

impl ChallengeRepository {
    pub fn new(db: AdminDb) -> Self {
        Self { db }
    }

    /// Raw canonical rows, active and inactive
    pub fn rows(&self) -> Result<Vec<ChallengeRow>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM challenges ORDER BY display_order, challenge_id"
        ))?;
        let rows = stmt
            .query_map([], read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read challenges")?;
        Ok(rows)
    }

    /// Every challenge including soft-removed ones
    pub fn list_all(&self) -> Result<Vec<Challenge>> {
        Ok(self.rows()?.iter().map(from_canonical).collect())
    }

    /// The active working set
    pub fn load(&self) -> Result<ChallengeSet> {
        Ok(ChallengeSet::new(self.list_all()?))
    }

    pub fn get(&self, id: &str) -> Result<Option<Challenge>> {
        let conn = self.db.conn();
        let row = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM challenges WHERE challenge_id = ?1"),
                params![id],
                read_row,
            )
            .optional()
            .with_context(|| format!("Failed to read challenge {id}"))?;
        Ok(row.as_ref().map(from_canonical))
    }

    /// Persist a working set in one transaction.
    ///
    /// Every challenge in `set` is upserted; active rows missing from `set` are
    /// marked inactive. Nothing is written if any row fails.
    pub fn commit(&self, set: &ChallengeSet) -> Result<()> {
        let mut conn = self.db.conn();
        let tx = conn
            .transaction()
            .context("Failed to begin challenge commit")?;
        let now = chrono::Utc::now().timestamp_millis();

        for challenge in set.challenges() {
            let row = to_canonical(challenge);
            upsert_row(&tx, &row, now)
                .map_err(|e| BatchWriteError::new(TABLE, &row.challenge_id, e))?;
        }

        let keep: HashSet<&str> = set.challenges().iter().map(|c| c.id.as_str()).collect();
        let active: Vec<String> = {
            let mut stmt = tx.prepare("SELECT challenge_id FROM challenges WHERE is_active = 1")?;
            let ids = stmt
                .query_map([], |r| r.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            ids
        };
        let mut removed = 0;
        for id in active.iter().filter(|id| !keep.contains(id.as_str())) {
            tx.execute(
                "UPDATE challenges SET is_active = 0, updated_at = ?2 WHERE challenge_id = ?1",
                params![id, now],
            )
            .map_err(|e| BatchWriteError::new(TABLE, id, e))?;
            removed += 1;
        }

        tx.commit().context("Failed to commit challenges")?;
        info!(
            "Committed {} challenges ({} deactivated)",
            set.len(),
            removed
        );
        Ok(())
    }

    /// Persist only `day_order` for every challenge in `set`, all or nothing
    pub fn save_order(&self, set: &ChallengeSet) -> Result<()> {
        let mut conn = self.db.conn();
        let tx = conn.transaction().context("Failed to begin reorder")?;
        let now = chrono::Utc::now().timestamp_millis();

        for challenge in set.challenges() {
            let changed = tx
                .execute(
                    "UPDATE challenges SET display_order = ?2, updated_at = ?3 WHERE challenge_id = ?1 AND is_active = 1",
                    params![challenge.id, challenge.day_order, now],
                )
                .map_err(|e| BatchWriteError::new(TABLE, &challenge.id, e))?;
            if changed == 0 {
                return Err(BatchWriteError::new(TABLE, &challenge.id, "no active row").into());
            }
            debug!("Challenge {} -> day {}", challenge.id, challenge.day_order);
        }

        tx.commit().context("Failed to commit reorder")?;
        info!("Saved order of {} challenges", set.len());
        Ok(())
    }
}
