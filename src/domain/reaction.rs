//! Reaction catalogs (read-only input)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which catalog a reaction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// Reactions on challenge submissions
    Reaction,
    /// Reactions offered to parents
    ParentReaction,
}

impl ReactionKind {
    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            Self::Reaction => "reactions",
            Self::ParentReaction => "parent_reactions",
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub reaction_id: i64,
    pub emoji: String,
    pub label: String,
    pub is_active: bool,
    pub display_order: i64,
}

/// Active reactions in display order
#[derive(Debug, Clone, Default)]
pub struct ReactionCatalog {
    entries: Vec<Reaction>,
}

impl ReactionCatalog {
    /// Build from raw rows: inactive entries are dropped, the rest sorted by display order
    pub fn from_rows(rows: impl IntoIterator<Item = Reaction>) -> Self {
        let mut entries: Vec<Reaction> = rows.into_iter().filter(|r| r.is_active).collect();
        entries.sort_by_key(|r| r.display_order);
        Self { entries }
    }

    pub fn entries(&self) -> &[Reaction] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Reaction> {
        let id: i64 = id.trim().parse().ok()?;
        self.entries.iter().find(|r| r.reaction_id == id)
    }

    /// Resolve associated ids in catalog order; ids missing from the catalog are skipped
    pub fn resolve(&self, ids: &BTreeSet<String>) -> Vec<&Reaction> {
        self.entries
            .iter()
            .filter(|r| ids.contains(&r.reaction_id.to_string()))
            .collect()
    }

    /// Associated ids with no active catalog entry
    pub fn dangling<'a>(&self, ids: &'a BTreeSet<String>) -> Vec<&'a str> {
        ids.iter()
            .filter(|id| self.get(id).is_none())
            .map(|id| id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
