//! Config commands (edit `~/.dadderup/config.toml`)

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::print_json;
use crate::commands::ConfigCommands;
use crate::config::Config;

pub fn config_command(config_path: Option<PathBuf>, command: ConfigCommands) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);
    let mut config = Config::load_from(&config_path)?;

    match command {
        ConfigCommands::Show { json } => {
            if json {
                return print_json(&config);
            }
            let content =
                toml::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("# {}", config_path.display());
            print!("{}", content);
        }
        ConfigCommands::Set { key, value } => {
            config.set_value(&key, &value)?;
            config.save_to_file(&config_path)?;
            println!("Set {} = {} in {}", key, value, config_path.display());
        }
    }
    Ok(())
}
