//! Shared test utilities for store and editor tests
#![allow(dead_code)]

use tempfile::TempDir;

use dadderup::editor::{ChallengeForm, ChallengeSet, EditorRules};
use dadderup::store::AdminStore;

/// Opens a store backed by a file in a fresh temp directory
pub fn temp_store() -> (TempDir, AdminStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store =
        AdminStore::with_path(&temp_dir.path().join("admin.db")).expect("Failed to open store");
    (temp_dir, store)
}

/// Make every insert or update of `key_column = key` in `table` abort
pub fn reject_writes(dir: &TempDir, table: &str, key_column: &str, key: &str) {
    let conn = rusqlite::Connection::open(dir.path().join("admin.db"))
        .expect("Failed to open db for trigger");
    for event in ["INSERT", "UPDATE"] {
        conn.execute_batch(&format!(
            "CREATE TRIGGER reject_{table}_{event} BEFORE {event} ON {table}
             WHEN NEW.{key_column} = '{key}'
             BEGIN SELECT RAISE(ABORT, 'rejected by test'); END;"
        ))
        .expect("Failed to install trigger");
    }
}

/// Working set with challenges titled "Day 1".."Day n"
pub fn challenge_set(n: usize) -> ChallengeSet {
    let rules = EditorRules::default();
    (1..=n).fold(ChallengeSet::default(), |set, i| {
        let (next, _) = set
            .create(&ChallengeForm::new(format!("Day {i}")), &rules)
            .expect("Failed to create challenge");
        next
    })
}

pub fn titles(set: &ChallengeSet) -> Vec<String> {
    set.challenges().iter().map(|c| c.title.clone()).collect()
}

pub fn days(set: &ChallengeSet) -> Vec<u32> {
    set.challenges().iter().map(|c| c.day_order).collect()
}
