use crate::{BrokerError, ChannelStore};

use lc_core::{ChannelId, ChannelType, LeagueId, MessageDraft, MessageIdGenerator, UserId};

use std::collections::HashSet;
use std::sync::Arc;

fn store() -> ChannelStore {
    ChannelStore::new(Arc::new(MessageIdGenerator::new()))
}

fn users(names: &[&str]) -> Vec<UserId> {
    names.iter().map(|n| UserId::from(*n)).collect()
}

#[tokio::test]
async fn given_league_channel_when_created_twice_then_same_channel_returned() {
    let store = store();
    let league = LeagueId::from("L1");

    let first = store.create_league_channel(&league).await;
    let second = store.create_league_channel(&league).await;

    assert_eq!(first.id, ChannelId::from("league:L1"));
    assert_eq!(first.id, second.id);
    assert_eq!(store.channel_count().await, 1);
}

#[tokio::test]
async fn given_existing_commissioner_channel_when_created_again_then_invalid_state() {
    let store = store();
    let league = LeagueId::from("L1");
    store
        .create_commissioner_channel(&league, UserId::from("comm"))
        .await
        .unwrap();

    let result = store
        .create_commissioner_channel(&league, UserId::from("comm"))
        .await;

    assert!(matches!(result, Err(BrokerError::InvalidState { .. })));
}

#[tokio::test]
async fn given_league_with_channels_when_listed_then_ordered_by_type() {
    let store = store();
    let league = LeagueId::from("L1");
    store
        .create_trade_channel(&league, users(&["a", "b"]), "Trade")
        .await
        .unwrap();
    store
        .create_team_channel(&league, "t1", users(&["a"]), "Team One")
        .await
        .unwrap();
    store
        .create_commissioner_channel(&league, UserId::from("comm"))
        .await
        .unwrap();
    store.create_league_channel(&league).await;
    store.create_league_channel(&LeagueId::from("L2")).await;

    let types: Vec<ChannelType> = store
        .channels_for_league(&league)
        .await
        .into_iter()
        .map(|c| c.channel_type)
        .collect();

    assert_eq!(
        types,
        vec![
            ChannelType::League,
            ChannelType::Commissioner,
            ChannelType::Team,
            ChannelType::Trade
        ]
    );
}

#[tokio::test]
async fn given_trade_channel_when_archived_twice_then_second_call_reports_no_change() {
    let store = store();
    let channel = store
        .create_trade_channel(&LeagueId::from("L1"), users(&["a", "b"]), "Trade")
        .await
        .unwrap();

    assert!(store.archive(&channel.id).await.unwrap());
    assert!(!store.archive(&channel.id).await.unwrap());
    assert!(!store.get(&channel.id).await.unwrap().is_active);
}

#[tokio::test]
async fn given_league_channel_when_archived_then_invalid_state() {
    let store = store();
    let channel = store.create_league_channel(&LeagueId::from("L1")).await;

    let result = store.archive(&channel.id).await;

    assert!(matches!(result, Err(BrokerError::InvalidState { .. })));
}

#[tokio::test]
async fn given_unknown_channel_when_slot_requested_then_not_found() {
    let store = store();

    let result = store.slot(&ChannelId::from("trade:nope")).await;

    assert!(matches!(result, Err(BrokerError::NotFound { .. })));
}

#[tokio::test]
async fn given_archived_channel_when_appending_then_invalid_state() {
    let store = store();
    let channel = store
        .create_trade_channel(&LeagueId::from("L1"), users(&["a", "b"]), "Trade")
        .await
        .unwrap();
    store.archive(&channel.id).await.unwrap();

    let slot = store.slot(&channel.id).await.unwrap();
    let mut state = slot.lock().await;
    let result = state.append(
        store.ids(),
        MessageDraft::text(UserId::from("a"), "A", "late offer"),
        &HashSet::new(),
    );

    assert!(matches!(result, Err(BrokerError::InvalidState { .. })));
    assert!(state.log.is_empty());
}

#[tokio::test]
async fn given_non_participant_when_appending_then_denied() {
    let store = store();
    let channel = store
        .create_trade_channel(&LeagueId::from("L1"), users(&["a", "b"]), "Trade")
        .await
        .unwrap();

    let slot = store.slot(&channel.id).await.unwrap();
    let mut state = slot.lock().await;
    let result = state.append(
        store.ids(),
        MessageDraft::text(UserId::from("mallory"), "Mallory", "let me in"),
        &HashSet::new(),
    );

    assert!(matches!(result, Err(BrokerError::Denied { .. })));
}

#[tokio::test]
async fn given_reply_to_unknown_message_when_appending_then_not_found() {
    let store = store();
    let channel = store
        .create_trade_channel(&LeagueId::from("L1"), users(&["a", "b"]), "Trade")
        .await
        .unwrap();

    let slot = store.slot(&channel.id).await.unwrap();
    let mut state = slot.lock().await;
    let result = state.append(
        store.ids(),
        MessageDraft::text(UserId::from("a"), "A", "re: nothing")
            .with_reply_to(Some(store.ids().next_id())),
        &HashSet::new(),
    );

    assert!(matches!(result, Err(BrokerError::NotFound { .. })));
}

#[tokio::test]
async fn given_appended_message_when_indexed_then_channel_of_resolves_until_forgotten() {
    let store = store();
    let channel = store
        .create_trade_channel(&LeagueId::from("L1"), users(&["a", "b"]), "Trade")
        .await
        .unwrap();
    let slot = store.slot(&channel.id).await.unwrap();
    let message = {
        let mut state = slot.lock().await;
        state
            .append(
                store.ids(),
                MessageDraft::text(UserId::from("a"), "A", "offer"),
                &HashSet::new(),
            )
            .unwrap()
    };
    store.index_message(message.id, channel.id.clone()).await;

    assert_eq!(store.channel_of(message.id).await.unwrap(), channel.id);

    store.forget_messages(&[message.id]).await;
    assert!(matches!(
        store.channel_of(message.id).await,
        Err(BrokerError::NotFound { .. })
    ));
    assert_eq!(store.indexed_message_count().await, 0);
}

#[tokio::test]
async fn given_message_with_viewer_when_appended_then_only_absent_participants_gain_unread() {
    let store = store();
    let channel = store
        .create_trade_channel(&LeagueId::from("L1"), users(&["a", "b", "c"]), "Trade")
        .await
        .unwrap();
    let slot = store.slot(&channel.id).await.unwrap();
    let viewers: HashSet<UserId> = [UserId::from("b")].into_iter().collect();

    {
        let mut state = slot.lock().await;
        state
            .append(
                store.ids(),
                MessageDraft::text(UserId::from("a"), "A", "offer"),
                &viewers,
            )
            .unwrap();
    }

    assert_eq!(store.unread_count(&channel.id, &UserId::from("a")).await.unwrap(), 0);
    assert_eq!(store.unread_count(&channel.id, &UserId::from("b")).await.unwrap(), 0);
    assert_eq!(store.unread_count(&channel.id, &UserId::from("c")).await.unwrap(), 1);
}
