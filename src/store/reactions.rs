//! Reaction catalog tables

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use tracing::info;

use super::BatchWriteError;
use super::db::AdminDb;
use crate::{Reaction, ReactionCatalog, ReactionKind};

/// Repository for the `reactions` and `parent_reactions` tables
pub struct ReactionRepository {
    db: AdminDb,
}

impl ReactionRepository {
    pub fn new(db: AdminDb) -> Self {
        Self { db }
    }

    /// All rows of one catalog, inactive included
    pub fn list(&self, kind: ReactionKind) -> Result<Vec<Reaction>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT reaction_id, emoji, label, is_active, display_order FROM {} ORDER BY display_order",
            kind.table()
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Reaction {
                    reaction_id: row.get(0)?,
                    emoji: row.get(1)?,
                    label: row.get(2)?,
                    is_active: row.get(3)?,
                    display_order: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read {}", kind.table()))?;
        Ok(rows)
    }

    /// Active entries in display order
    pub fn catalog(&self, kind: ReactionKind) -> Result<ReactionCatalog> {
        Ok(ReactionCatalog::from_rows(self.list(kind)?))
    }

    /// Insert or replace one entry (seeding)
    pub fn upsert(&self, kind: ReactionKind, reaction: &Reaction) -> Result<()> {
        let conn = self.db.conn();
        upsert_row(&conn, kind, reaction)
            .with_context(|| format!("Failed to write {} {}", kind.table(), reaction.reaction_id))
    }

    /// Insert or replace every entry in one transaction; nothing is written if any row fails
    pub fn upsert_many(&self, kind: ReactionKind, reactions: &[Reaction]) -> Result<()> {
        let mut conn = self.db.conn();
        let tx = conn
            .transaction()
            .with_context(|| format!("Failed to begin {} import", kind.table()))?;

        for reaction in reactions {
            upsert_row(&tx, kind, reaction).map_err(|e| {
                BatchWriteError::new(kind.table(), reaction.reaction_id.to_string(), e)
            })?;
        }

        tx.commit()
            .with_context(|| format!("Failed to commit {} import", kind.table()))?;
        info!("Imported {} entries into {}", reactions.len(), kind.table());
        Ok(())
    }
}

fn upsert_row(conn: &Connection, kind: ReactionKind, reaction: &Reaction) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {} (reaction_id, emoji, label, is_active, display_order) VALUES (?1, ?2, ?3, ?4, ?5)",
            kind.table()
        ),
        params![
            reaction.reaction_id,
            reaction.emoji,
            reaction.label,
            reaction.is_active,
            reaction.display_order,
        ],
    )?;
    Ok(())
}
