//! Plan display configurations

use std::collections::HashSet;

use anyhow::{Context, Result};
use rusqlite::params;
use tracing::{info, warn};

use super::BatchWriteError;
use super::db::AdminDb;
use crate::editor::PlanSet;
use crate::{PlanDisplayConfig, PlanKey, ProductSource};

const TABLE: &str = "plan_configs";

/// Repository for the `plan_configs` table
pub struct PlanRepository {
    db: AdminDb,
}

impl PlanRepository {
    pub fn new(db: AdminDb) -> Self {
        Self { db }
    }

    pub fn load(&self) -> Result<PlanSet> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            r#"
            SELECT product_source, product_id, custom_title, custom_description,
                   custom_features, show_on_plans_page, display_order
            FROM plan_configs ORDER BY display_order
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, bool>(5)?,
                    row.get::<_, u32>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read plan configs")?;

        let configs = rows.into_iter().filter_map(
            |(source, product_id, title, description, features, visible, order)| {
                let Some(source) = ProductSource::from_str(&source) else {
                    warn!("Skipping plan {}:{} with unknown source", source, product_id);
                    return None;
                };
                Some(PlanDisplayConfig {
                    key: PlanKey::new(source, product_id),
                    custom_title: title,
                    custom_description: description,
                    custom_features: features
                        .and_then(|s| serde_json::from_str(&s).ok())
                        .unwrap_or_default(),
                    show_on_plans_page: visible,
                    display_order: order,
                })
            },
        );
        Ok(PlanSet::new(configs))
    }

    /// Replace the stored configurations with `set` in one transaction
    pub fn commit(&self, set: &PlanSet) -> Result<()> {
        let mut conn = self.db.conn();
        let tx = conn.transaction().context("Failed to begin plan commit")?;
        let now = chrono::Utc::now().timestamp_millis();

        for config in set.configs() {
            let features =
                serde_json::to_string(&config.custom_features).unwrap_or_else(|_| "[]".to_string());
            tx.execute(
                r#"
                INSERT INTO plan_configs (
                    product_source, product_id, custom_title, custom_description,
                    custom_features, show_on_plans_page, display_order, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(product_source, product_id) DO UPDATE SET
                    custom_title = excluded.custom_title,
                    custom_description = excluded.custom_description,
                    custom_features = excluded.custom_features,
                    show_on_plans_page = excluded.show_on_plans_page,
                    display_order = excluded.display_order,
                    updated_at = excluded.updated_at
                "#,
                params![
                    config.key.source.as_str(),
                    config.key.product_id,
                    config.custom_title,
                    config.custom_description,
                    features,
                    config.show_on_plans_page,
                    config.display_order,
                    now,
                ],
            )
            .map_err(|e| BatchWriteError::new(TABLE, config.key.to_string(), e))?;
        }

        let keep: HashSet<(String, String)> = set
            .configs()
            .iter()
            .map(|c| (c.key.source.as_str().to_string(), c.key.product_id.clone()))
            .collect();
        let stored: Vec<(String, String)> = {
            let mut stmt = tx.prepare("SELECT product_source, product_id FROM plan_configs")?;
            let keys = stmt
                .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            keys
        };
        for (source, product_id) in stored.iter().filter(|k| !keep.contains(*k)) {
            tx.execute(
                "DELETE FROM plan_configs WHERE product_source = ?1 AND product_id = ?2",
                params![source, product_id],
            )
            .map_err(|e| BatchWriteError::new(TABLE, format!("{source}:{product_id}"), e))?;
        }

        tx.commit().context("Failed to commit plan configs")?;
        info!("Committed {} plan configs", set.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_and_load() {
        let repo = PlanRepository::new(AdminDb::open_in_memory().unwrap());
        let key = |id: &str| PlanKey::new(ProductSource::Internal, id);
        let set = PlanSet::default()
            .upsert(PlanDisplayConfig::new(key("a")).with_features(vec!["x".to_string()]))
            .upsert(PlanDisplayConfig::new(key("b")).hidden());
        repo.commit(&set).unwrap();
        assert_eq!(repo.load().unwrap(), set);

        let set = set.move_item(1, 0).unwrap().remove(&key("a")).unwrap();
        repo.commit(&set).unwrap();
        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.configs()[0].key, key("b"));
        assert_eq!(loaded.configs()[0].display_order, 0);
    }
}
