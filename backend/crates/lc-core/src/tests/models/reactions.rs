use crate::{Reactions, UserId};

use proptest::prelude::*;

#[test]
fn given_new_reaction_when_added_then_counted_once() {
    let mut reactions = Reactions::new();
    let alice = UserId::from("alice");

    assert!(reactions.add(&alice, "🔥"));
    assert!(!reactions.add(&alice, "🔥"));

    assert_eq!(reactions.count("🔥"), 1);
    assert!(reactions.has_reacted(&alice, "🔥"));
}

#[test]
fn given_missing_reaction_when_removed_then_noop() {
    let mut reactions = Reactions::new();

    assert!(!reactions.remove(&UserId::from("bob"), "👍"));
    assert!(reactions.is_empty());
}

#[test]
fn given_last_user_when_removed_then_emoji_entry_dropped() {
    let mut reactions = Reactions::new();
    let alice = UserId::from("alice");
    reactions.add(&alice, "👍");

    assert!(reactions.remove(&alice, "👍"));

    assert!(!reactions.contains_emoji("👍"));
    assert_eq!(reactions.distinct_emoji(), 0);
}

#[test]
fn given_reactions_when_serialized_then_count_matches_users() {
    let mut reactions = Reactions::new();
    reactions.add(&UserId::from("a"), "👍");
    reactions.add(&UserId::from("b"), "👍");
    reactions.add(&UserId::from("a"), "😂");

    let value = serde_json::to_value(&reactions).unwrap();
    let list = value.as_array().unwrap();

    assert_eq!(list.len(), 2);
    for entry in list {
        let users = entry["users"].as_array().unwrap();
        assert_eq!(entry["count"].as_u64().unwrap() as usize, users.len());
    }

    let back: Reactions = serde_json::from_value(value).unwrap();
    assert_eq!(back, reactions);
}

proptest! {
    #[test]
    fn given_any_toggle_sequence_when_applied_then_count_equals_user_set(
        ops in proptest::collection::vec((any::<bool>(), 0u8..5, 0u8..3), 0..200)
    ) {
        let emoji = ["👍", "🔥", "😂"];
        let mut reactions = Reactions::new();
        let mut model: std::collections::HashSet<(u8, u8)> = Default::default();

        for (add, user, e) in ops {
            let user_id = UserId::new(format!("user-{user}"));
            if add {
                prop_assert_eq!(reactions.add(&user_id, emoji[e as usize]), model.insert((user, e)));
            } else {
                prop_assert_eq!(reactions.remove(&user_id, emoji[e as usize]), model.remove(&(user, e)));
            }
        }

        for (e, name) in emoji.iter().enumerate() {
            let expected = model.iter().filter(|(_, me)| *me as usize == e).count();
            prop_assert_eq!(reactions.count(name), expected);
        }
        for reaction in reactions.iter() {
            prop_assert_eq!(reaction.count, reaction.users.len());
        }
    }
}
