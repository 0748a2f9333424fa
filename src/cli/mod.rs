//! CLI command implementations

pub mod badge;
pub mod challenge;
pub mod config;
pub mod init;
pub mod plan;
pub mod reaction;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::store::AdminStore;

/// Loaded config plus the store it points at
pub struct AdminContext {
    pub config: Config,
    pub store: AdminStore,
}

impl AdminContext {
    /// Load config (global unless overridden) and open the database it names
    pub fn open(config_override: Option<&PathBuf>, db_override: Option<&PathBuf>) -> Result<Self> {
        let config = match config_override {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let db_path = db_override
            .cloned()
            .unwrap_or_else(|| config.database_path());
        debug!("Using database {}", db_path.display());
        let store = AdminStore::with_path(&db_path)?;
        Ok(Self { config, store })
    }
}

/// Read a list of records from a YAML (`.yaml`/`.yml`) or JSON file
pub fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))
    }
}

/// Print `value` as pretty JSON
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
