//! Configuration loading and management

mod io;
mod settings;

pub use settings::{ChallengeSettings, Settings, StoreSettings};

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::SubmissionChannel;

/// Default configuration content written by `dadderup init` and on first load
pub const DEFAULT_CONFIG: &str = r#"# DadderUp admin configuration
# ============================
#
# refresh_interval_secs - seconds between dashboard refreshes in `dadderup watch` (default: 30)

[settings]
refresh_interval_secs = 30

# Challenge editor
#
#   max_day_order             - highest day a challenge can be placed on (default: no cap)
#   default_points            - point schedule for new challenges
#   default_submission_types  - channels enabled on new challenges
[settings.challenges]
# max_day_order = 7

[settings.challenges.default_points]
text = 1
image = 3
audio = 5
video = 10
shop = 5

[settings.challenges.default_submission_types]
text = true
image = false
audio = true
video = true

# Local admin database
[store]
# database_path = "/var/lib/dadderup/admin.db"
"#;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,

    /// Storage settings
    #[serde(default)]
    pub store: StoreSettings,
}

impl Config {
    /// Create a config with the built-in defaults
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Database file to open
    pub fn database_path(&self) -> PathBuf {
        self.store
            .database_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("admin.db"))
    }

    /// Set one value by dotted key, e.g. `settings.challenges.max_day_order`.
    ///
    /// `none` clears optional values.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let clear = value.eq_ignore_ascii_case("none");

        match key {
            "settings.refresh_interval_secs" => {
                self.settings.refresh_interval_secs = parse_number(key, value)?;
            }
            "settings.challenges.max_day_order" => {
                self.settings.challenges.max_day_order = if clear {
                    None
                } else {
                    let max: u32 = parse_number(key, value)?;
                    if max == 0 {
                        bail!("{} must be at least 1", key);
                    }
                    Some(max)
                };
            }
            "store.database_path" => {
                self.store.database_path = (!clear).then(|| PathBuf::from(value));
            }
            _ => {
                let Some(channel) = key
                    .strip_prefix("settings.challenges.default_points.")
                    .and_then(SubmissionChannel::from_str)
                else {
                    bail!("Unknown config key: {}", key);
                };
                self.settings
                    .challenges
                    .default_points
                    .set(channel, parse_number(key, value)?);
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid value for {}: {}", key, value))
}
