//! Settings configuration types

use serde::{Deserialize, Serialize};

use crate::editor::EditorRules;
use crate::{PointSchedule, SubmissionTypes};

/// General settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds between dashboard refreshes in `dadderup watch`
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Challenge editor limits and defaults
    #[serde(default)]
    pub challenges: ChallengeSettings,
}

fn default_refresh_interval_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            challenges: ChallengeSettings::default(),
        }
    }
}

/// `[settings.challenges]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSettings {
    /// Highest selectable day; unset means no cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_day_order: Option<u32>,

    /// Point schedule for new challenges
    #[serde(default)]
    pub default_points: PointSchedule,

    /// Submission channels enabled on new challenges
    #[serde(default)]
    pub default_submission_types: SubmissionTypes,
}

impl ChallengeSettings {
    pub fn rules(&self) -> EditorRules {
        EditorRules {
            max_day_order: self.max_day_order,
            default_points: self.default_points,
            default_submission_types: self.default_submission_types,
        }
    }
}

/// `[store]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite file; defaults to ~/.dadderup/admin.db
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<std::path::PathBuf>,
}
