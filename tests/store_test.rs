//! Store persistence and batch atomicity

mod common;

use common::{challenge_set, days, reject_writes, temp_store, titles};
use dadderup::editor::{BadgeForm, BadgeSet, ChallengeForm, EditorRules, PlanSet};
use dadderup::store::{AdminStore, BatchWriteError};
use dadderup::{
    ActionTriggerType, PlanDisplayConfig, PlanKey, ProductSource, Reaction, ReactionKind,
    SubmissionChannel,
};

#[test]
fn test_commit_and_reload() {
    let (_dir, store) = temp_store();
    let set = challenge_set(3);
    store.challenges().commit(&set).unwrap();

    let loaded = store.challenges().load().unwrap();
    assert_eq!(loaded, set);
}

#[test]
fn test_disabled_channel_points_persist() {
    let (_dir, store) = temp_store();
    let form = ChallengeForm::new("Photo day").with_points(SubmissionChannel::Image, 7);
    let (set, created) = challenge_set(0)
        .create(&form, &EditorRules::default())
        .unwrap();
    assert!(!created.enabled_submission_types.image);
    store.challenges().commit(&set).unwrap();

    let loaded = store.challenges().get(&created.id).unwrap().unwrap();
    assert_eq!(loaded.points.image, 7);
    assert_eq!(loaded.points_for(SubmissionChannel::Image), None);
}

#[test]
fn test_delete_is_soft() {
    let (_dir, store) = temp_store();
    let set = challenge_set(3);
    store.challenges().commit(&set).unwrap();

    let id = set.by_day(2).unwrap().id.clone();
    store.challenges().commit(&set.delete(&id).unwrap()).unwrap();

    let active = store.challenges().load().unwrap();
    assert_eq!(titles(&active), vec!["Day 1", "Day 3"]);
    assert_eq!(days(&active), vec![1, 2]);

    let removed = store.challenges().get(&id).unwrap().unwrap();
    assert!(!removed.is_active);
    assert_eq!(store.challenges().list_all().unwrap().len(), 3);
}

#[test]
fn test_failed_reorder_leaves_order_untouched() {
    let (_dir, store) = temp_store();
    let set = challenge_set(3);
    store.challenges().commit(&set).unwrap();

    // the new challenge was never committed, so the last row update fails
    let (with_new, _) = set
        .create(&ChallengeForm::new("Unsaved"), &EditorRules::default())
        .unwrap();
    let mut ids = with_new.ids();
    ids[..3].reverse();
    let reordered = with_new.reorder(&ids).unwrap();

    let err = store.challenges().save_order(&reordered).unwrap_err();
    let batch = err
        .downcast_ref::<BatchWriteError>()
        .expect("batch error");
    assert_eq!(batch.table, "challenges");

    let loaded = store.challenges().load().unwrap();
    assert_eq!(titles(&loaded), vec!["Day 1", "Day 2", "Day 3"]);
}

#[test]
fn test_failed_commit_rolls_back_earlier_rows() {
    let (dir, store) = temp_store();
    let set = challenge_set(3);
    store.challenges().commit(&set).unwrap();

    // Day 1 moves to the end, so its row is written last
    let first = set.by_day(1).unwrap().id.clone();
    let moved = set.move_item(0, 2).unwrap();
    assert_eq!(moved.ids().last(), Some(&first));
    reject_writes(&dir, "challenges", "challenge_id", &first);

    let err = store.challenges().commit(&moved).unwrap_err();
    let batch = err
        .downcast_ref::<BatchWriteError>()
        .expect("batch error");
    assert_eq!(batch.table, "challenges");
    assert_eq!(batch.row, first);

    let loaded = store.challenges().load().unwrap();
    assert_eq!(titles(&loaded), vec!["Day 1", "Day 2", "Day 3"]);
    assert_eq!(days(&loaded), vec![1, 2, 3]);
}

#[test]
fn test_failed_plan_commit_rolls_back_earlier_rows() {
    let (dir, store) = temp_store();
    let key = |id: &str| PlanKey::new(ProductSource::Woocommerce, id);
    let plans = PlanSet::default()
        .upsert(PlanDisplayConfig::new(key("1")))
        .upsert(PlanDisplayConfig::new(key("2")))
        .upsert(PlanDisplayConfig::new(key("3")));
    store.plans().commit(&plans).unwrap();

    let moved = plans.move_item(0, 2).unwrap();
    assert_eq!(moved.keys(), vec!["woocommerce:2", "woocommerce:3", "woocommerce:1"]);
    reject_writes(&dir, "plan_configs", "product_id", "1");

    let err = store.plans().commit(&moved).unwrap_err();
    let batch = err
        .downcast_ref::<BatchWriteError>()
        .expect("batch error");
    assert_eq!(batch.table, "plan_configs");
    assert_eq!(batch.row, "woocommerce:1");

    let loaded = store.plans().load().unwrap();
    assert_eq!(loaded, plans);
}

#[test]
fn test_reorder_persists() {
    let (_dir, store) = temp_store();
    let set = challenge_set(4);
    store.challenges().commit(&set).unwrap();

    let moved = set.move_item(3, 0).unwrap();
    store.challenges().save_order(&moved).unwrap();
    let loaded = store.challenges().load().unwrap();
    assert_eq!(titles(&loaded), vec!["Day 4", "Day 1", "Day 2", "Day 3"]);
}

#[test]
fn test_import_commits_together() {
    let (_dir, store) = temp_store();
    store.challenges().commit(&challenge_set(2)).unwrap();

    let set = store.challenges().load().unwrap();
    let forms = vec![ChallengeForm::new("A"), ChallengeForm::new("B").with_day(1)];
    let (next, created) = set.import(&forms, &EditorRules::default()).unwrap();
    store.challenges().commit(&next).unwrap();

    assert_eq!(created.len(), 2);
    let loaded = store.challenges().load().unwrap();
    assert_eq!(titles(&loaded), vec!["Day 1", "B", "Day 2", "A"]);
}

#[test]
fn test_snapshot_load() {
    let store = AdminStore::in_memory().unwrap();
    store
        .reactions()
        .upsert(
            ReactionKind::Reaction,
            &Reaction {
                reaction_id: 3,
                emoji: "💪".to_string(),
                label: "Strong".to_string(),
                is_active: true,
                display_order: 0,
            },
        )
        .unwrap();

    let (badges, _) = BadgeSet::default()
        .create(BadgeForm::new("Streak").select_action(ActionTriggerType::StreakMilestone))
        .unwrap();
    store.badges().save(&badges).unwrap();

    let snapshot = store.load().unwrap();
    assert_eq!(snapshot.reactions.len(), 1);
    assert!(snapshot.parent_reactions.is_empty());
    assert_eq!(
        snapshot.badges.by_condition("trigger_streak_milestone").len(),
        1
    );
    assert!(snapshot.challenges.is_empty());
}
