//! Init command implementation

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::store::AdminStore;

pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    Config::write_default(&config_path, force)?;
    println!("Created: {}", config_path.display());

    let config = Config::from_file(&config_path)?;
    let db_path = config.database_path();
    AdminStore::with_path(&db_path)?;
    println!("Database: {}", db_path.display());

    Ok(())
}
