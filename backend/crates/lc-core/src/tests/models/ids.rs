use crate::{ChannelId, LeagueId, MessageIdGenerator, UserId};

use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn given_league_when_deriving_channel_ids_then_scoped_by_type() {
    let league = LeagueId::from("L1");

    assert_eq!(ChannelId::league(&league).as_str(), "league:L1");
    assert_eq!(ChannelId::commissioner(&league).as_str(), "commissioner:L1");
    assert_eq!(ChannelId::team(&league, "T7").as_str(), "team:L1:T7");
}

#[test]
fn given_system_user_when_checked_then_is_system() {
    assert!(UserId::system().is_system());
    assert!(!UserId::from("alice").is_system());
}

#[test]
fn given_generator_when_called_repeatedly_then_ids_strictly_increase() {
    let generator = MessageIdGenerator::new();

    let mut previous = generator.next_id();
    for _ in 0..10_000 {
        let next = generator.next_id();
        assert!(next > previous);
        previous = next;
    }
}

#[test]
fn given_concurrent_callers_when_generating_then_ids_unique() {
    let generator = Arc::new(MessageIdGenerator::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = Arc::clone(&generator);
            std::thread::spawn(move || (0..1_000).map(|_| generator.next_id()).collect::<Vec<_>>())
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(seen.len(), 8_000);
}
