//! SQLite database connection and schema management for the admin store
//!
//! Manages the `~/.dadderup/admin.db` database with automatic schema migration.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

use crate::config::Config;

/// Database wrapper shared by all repositories
#[derive(Clone)]
pub struct AdminDb {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl AdminDb {
    /// Open or create the database at the default location (~/.dadderup/admin.db)
    pub fn open_default() -> Result<Self> {
        let db_path = Config::global_config_dir().join("admin.db");
        Self::open(&db_path)
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open admin db: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        debug!("Opened admin db at {}", path.display());
        Ok(db)
    }

    /// In-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory db")?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Admin DB lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| {
                r.get(0)
            })
            .unwrap_or(0);

        // Migration 2: keep non-numeric badge ids next to the numeric array
        if version < 2 {
            let has_slugs: bool = conn
                .prepare(
                    "SELECT COUNT(*) FROM pragma_table_info('challenges') WHERE name = 'associated_badge_slugs'",
                )
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_slugs {
                conn.execute_batch(
                    "ALTER TABLE challenges ADD COLUMN associated_badge_slugs TEXT NOT NULL DEFAULT '[]';",
                )?;
            }
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
INSERT OR IGNORE INTO schema_version VALUES (1);

CREATE TABLE IF NOT EXISTS challenges (
    challenge_id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    tip TEXT NOT NULL DEFAULT '',
    video_url TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    points_earned INTEGER,
    image_points INTEGER,
    audio_points INTEGER,
    video_points INTEGER,
    shop_points INTEGER,
    badges TEXT NOT NULL DEFAULT '[]',
    reactions TEXT NOT NULL DEFAULT '[]',
    parent_reactions TEXT NOT NULL DEFAULT '[]',
    submission_types TEXT,
    shop_button_enabled INTEGER NOT NULL DEFAULT 0,
    shop_type TEXT,
    shop_product_id TEXT,
    shop_url TEXT,
    woocommerce_product_id TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_challenges_order ON challenges(is_active, display_order);

CREATE TABLE IF NOT EXISTS app_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS reactions (
    reaction_id INTEGER PRIMARY KEY,
    emoji TEXT NOT NULL,
    label TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    display_order INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS parent_reactions (
    reaction_id INTEGER PRIMARY KEY,
    emoji TEXT NOT NULL,
    label TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    display_order INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS plan_configs (
    product_source TEXT NOT NULL,
    product_id TEXT NOT NULL,
    custom_title TEXT,
    custom_description TEXT,
    custom_features TEXT NOT NULL DEFAULT '[]',
    show_on_plans_page INTEGER NOT NULL DEFAULT 1,
    display_order INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (product_source, product_id)
);
"#;
