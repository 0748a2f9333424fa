//! Day ordering across create/update/delete/reorder

mod common;

use common::{challenge_set, days, titles};
use dadderup::EditError;
use dadderup::editor::{ChallengeForm, EditorRules};
use dadderup::ordering::{OrderBase, is_contiguous};
use proptest::prelude::*;

#[test]
fn test_insert_on_taken_day_appends_before_resort() {
    let set = challenge_set(4);
    let (set, created) = set
        .create(&ChallengeForm::new("Inserted").with_day(3), &EditorRules::default())
        .unwrap();

    assert_eq!(days(&set), vec![1, 2, 3, 4, 5]);
    assert_eq!(created.day_order, 4);
    assert_eq!(set.by_day(3).unwrap().title, "Day 3");
}

#[test]
fn test_delete_closes_gap() {
    let set = challenge_set(4);
    let id = set.by_day(2).unwrap().id.clone();
    let set = set.delete(&id).unwrap();

    assert_eq!(days(&set), vec![1, 2, 3]);
    assert_eq!(titles(&set), vec!["Day 1", "Day 3", "Day 4"]);
}

#[test]
fn test_update_tie_keeps_list_order() {
    let set = challenge_set(4);
    let id = set.by_day(1).unwrap().id.clone();
    let form = set.to_form(&id).unwrap().with_day(3);
    let (set, updated) = set.update(&id, &form, &EditorRules::default()).unwrap();

    assert_eq!(days(&set), vec![1, 2, 3, 4]);
    // ties keep current list order, so the edited record lands ahead of the old day 3
    assert_eq!(titles(&set), vec!["Day 2", "Day 1", "Day 3", "Day 4"]);
    assert_eq!(updated.day_order, 2);
}

#[test]
fn test_reorder_rejects_foreign_id() {
    let set = challenge_set(3);
    let mut ids = set.ids();
    ids[1] = "not-a-challenge".to_string();
    assert!(matches!(set.reorder(&ids), Err(EditError::InvalidPermutation(_))));
}

#[test]
fn test_move_out_of_range() {
    let set = challenge_set(3);
    assert!(matches!(
        set.move_item(0, 3),
        Err(EditError::PositionOutOfRange { position: 3, len: 3 })
    ));
}

proptest! {
    #[test]
    fn prop_reorder_assigns_positions(
        order in (1usize..12).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let set = challenge_set(order.len());
        let ids = set.ids();
        let permuted: Vec<String> = order.iter().map(|i| ids[*i].clone()).collect();

        let next = set.reorder(&permuted).unwrap();
        prop_assert_eq!(next.ids(), permuted);
        prop_assert_eq!(days(&next), (1..=order.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn prop_edits_keep_days_contiguous(
        n in 1usize..10,
        ops in prop::collection::vec((0u8..3, 0usize..10, 0usize..10), 0..20)
    ) {
        let rules = EditorRules::default();
        let mut set = challenge_set(n);
        for (op, a, b) in ops {
            set = match op {
                0 => set.create(&ChallengeForm::new("x").with_day(a as i64 + 1), &rules).unwrap().0,
                1 if !set.is_empty() => {
                    let id = set.challenges()[a % set.len()].id.clone();
                    set.delete(&id).unwrap()
                }
                2 if !set.is_empty() => set.move_item(a % set.len(), b % set.len()).unwrap(),
                _ => set,
            };
            prop_assert!(is_contiguous(set.challenges(), OrderBase::One));
        }
    }
}
