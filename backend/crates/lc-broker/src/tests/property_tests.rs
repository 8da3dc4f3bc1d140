use crate::MessageLog;

use lc_core::{ChannelId, LeagueId, MessageDraft, MessageIdGenerator, UserId};

use proptest::prelude::*;

#[derive(Debug, Clone)]
enum ReactionOp {
    Add(usize, usize),
    Remove(usize, usize),
}

const USERS: [&str; 4] = ["alice", "bob", "carol", "dave"];
const EMOJI: [&str; 3] = ["👍", "🔥", "😂"];

fn op() -> impl Strategy<Value = ReactionOp> {
    prop_oneof![
        (0..USERS.len(), 0..EMOJI.len()).prop_map(|(u, e)| ReactionOp::Add(u, e)),
        (0..USERS.len(), 0..EMOJI.len()).prop_map(|(u, e)| ReactionOp::Remove(u, e)),
    ]
}

proptest! {
    #[test]
    fn given_any_reaction_sequence_when_applied_then_counts_match_distinct_users(
        ops in proptest::collection::vec(op(), 0..60)
    ) {
        let ids = MessageIdGenerator::new();
        let mut log = MessageLog::new();
        let message_id = log
            .append(
                &ids,
                ChannelId::from("league:L1"),
                LeagueId::from("L1"),
                MessageDraft::text(UserId::from("alice"), "Alice", "react to me"),
            )
            .id;
        let mut expected = std::collections::BTreeSet::new();

        for op in ops {
            match op {
                ReactionOp::Add(u, e) => {
                    let (changed, _) = log
                        .add_reaction(message_id, &UserId::from(USERS[u]), EMOJI[e], EMOJI.len())
                        .unwrap();
                    prop_assert_eq!(changed, expected.insert((e, u)));
                }
                ReactionOp::Remove(u, e) => {
                    let (changed, _) = log
                        .remove_reaction(message_id, &UserId::from(USERS[u]), EMOJI[e])
                        .unwrap();
                    prop_assert_eq!(changed, expected.remove(&(e, u)));
                }
            }
        }

        let reactions = &log.get(message_id).unwrap().reactions;
        for (e, emoji) in EMOJI.iter().enumerate() {
            let users = expected.iter().filter(|(ee, _)| *ee == e).count();
            prop_assert_eq!(reactions.count(emoji), users);
            prop_assert_eq!(reactions.contains_emoji(emoji), users > 0);
        }
    }

    #[test]
    fn given_any_log_size_when_truncated_then_newest_cap_messages_survive(
        total in 0usize..200,
        cap in 1usize..100
    ) {
        let ids = MessageIdGenerator::new();
        let mut log = MessageLog::new();
        let mut appended = Vec::new();
        for i in 0..total {
            appended.push(
                log.append(
                    &ids,
                    ChannelId::from("league:L1"),
                    LeagueId::from("L1"),
                    MessageDraft::text(UserId::from("alice"), "Alice", format!("m{i}")),
                )
                .id,
            );
        }

        let dropped = log.truncate_to(cap);

        let kept = total.min(cap);
        prop_assert_eq!(log.len(), kept);
        prop_assert_eq!(dropped.len(), total - kept);
        let survivors: Vec<_> = log.recent(usize::MAX).map(|m| m.id).collect();
        prop_assert_eq!(survivors, appended[total - kept..].to_vec());
    }
}
