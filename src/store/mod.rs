//! Persistence for the admin data model
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        AdminStore                               │
//! │  - challenges        (canonical rows via the schema adapter)    │
//! │  - badge definitions (JSON list in app_settings)                │
//! │  - reaction catalogs (read-only input)                          │
//! │  - plan display configs                                         │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                    ~/.dadderup/admin.db
//! ```
//!
//! Multi-row writes run in one transaction. A failing row aborts the whole
//! batch and surfaces as [`BatchWriteError`] inside the returned `anyhow::Error`.
//!
//! # Usage
//!
//! ```ignore
//! let store = AdminStore::new()?;
//! let snapshot = store.load()?;
//!
//! let (next, created) = snapshot.challenges.create(&form, &rules)?;
//! store.challenges().commit(&next)?;
//! ```

mod challenges;
mod db;
mod plans;
mod reactions;
mod settings;

use std::fmt;

use anyhow::Result;

pub use challenges::ChallengeRepository;
pub use db::AdminDb;
pub use plans::PlanRepository;
pub use reactions::ReactionRepository;
pub use settings::{BADGE_DEFINITIONS_KEY, BadgeRepository, SettingsRepository};

use crate::ReactionCatalog;
use crate::ReactionKind;
use crate::editor::{BadgeSet, ChallengeSet, PlanSet};

/// A transactional batch was rolled back
#[derive(Debug, thiserror::Error)]
#[error("Batch write to {table} failed at {row}: {reason}")]
pub struct BatchWriteError {
    pub table: &'static str,
    /// Identity of the row that failed
    pub row: String,
    pub reason: String,
}

impl BatchWriteError {
    pub fn new(table: &'static str, row: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            table,
            row: row.into(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the admin console edits, loaded at once
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub challenges: ChallengeSet,
    pub badges: BadgeSet,
    pub reactions: ReactionCatalog,
    pub parent_reactions: ReactionCatalog,
    pub plans: PlanSet,
}

/// Entry point to the admin database
#[derive(Clone)]
pub struct AdminStore {
    db: AdminDb,
}

impl AdminStore {
    /// Open the store at the default location
    pub fn new() -> Result<Self> {
        Ok(Self {
            db: AdminDb::open_default()?,
        })
    }

    /// Open the store with a custom database path
    pub fn with_path(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            db: AdminDb::open(path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            db: AdminDb::open_in_memory()?,
        })
    }

    pub fn challenges(&self) -> ChallengeRepository {
        ChallengeRepository::new(self.db.clone())
    }

    pub fn badges(&self) -> BadgeRepository {
        BadgeRepository::new(self.db.clone())
    }

    pub fn reactions(&self) -> ReactionRepository {
        ReactionRepository::new(self.db.clone())
    }

    pub fn plans(&self) -> PlanRepository {
        PlanRepository::new(self.db.clone())
    }

    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.db.clone())
    }

    /// Load every working set
    pub fn load(&self) -> Result<Snapshot> {
        let reactions = self.reactions();
        Ok(Snapshot {
            challenges: self.challenges().load()?,
            badges: self.badges().load()?,
            reactions: reactions.catalog(ReactionKind::Reaction)?,
            parent_reactions: reactions.catalog(ReactionKind::ParentReaction)?,
            plans: self.plans().load()?,
        })
    }
}
