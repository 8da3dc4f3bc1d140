use crate::{Channel, ChannelId, ChannelType, LeagueId, Message, MessageDraft, MessageIdGenerator, UserId};

use std::collections::HashSet;

fn trade_channel(participants: &[&str]) -> Channel {
    let league = LeagueId::from("L1");
    let ids = MessageIdGenerator::new();
    Channel::new(
        ChannelId::trade(ids.next_id()),
        league,
        "Trade talk",
        ChannelType::Trade,
        participants.iter().map(|p| UserId::from(*p)),
    )
}

fn message_from(channel: &Channel, sender: &str) -> Message {
    let ids = MessageIdGenerator::new();
    Message::from_draft(
        ids.next_id(),
        channel.id.clone(),
        channel.league_id.clone(),
        MessageDraft::text(UserId::from(sender), sender, "hello"),
    )
}

#[test]
fn given_duplicate_participants_when_created_then_deduplicated_in_order() {
    let channel = trade_channel(&["a", "b", "a", "c", "b"]);

    let names: Vec<&str> = channel.participants.iter().map(UserId::as_str).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn given_participant_when_added_again_then_reports_false() {
    let mut channel = trade_channel(&["a"]);

    assert!(channel.add_participant(UserId::from("b")));
    assert!(!channel.add_participant(UserId::from("b")));
    assert_eq!(channel.participants.len(), 2);
}

#[test]
fn given_non_participant_when_checking_post_then_only_system_allowed() {
    let channel = trade_channel(&["a"]);

    assert!(channel.may_post(&UserId::from("a")));
    assert!(!channel.may_post(&UserId::from("z")));
    assert!(channel.may_post(&UserId::system()));
}

#[test]
fn given_messages_from_other_sender_when_recorded_then_unread_counts_everyone_else() {
    let mut channel = trade_channel(&["a", "b", "c"]);

    for _ in 0..3 {
        let message = message_from(&channel, "a");
        channel.record_incoming(&message, &HashSet::new());
    }

    assert_eq!(channel.unread_for(&UserId::from("a")), 0);
    assert_eq!(channel.unread_for(&UserId::from("b")), 3);
    assert_eq!(channel.unread_for(&UserId::from("c")), 3);
}

#[test]
fn given_viewer_when_message_recorded_then_viewer_unread_unchanged() {
    let mut channel = trade_channel(&["a", "b", "c"]);
    let viewers: HashSet<UserId> = [UserId::from("b")].into_iter().collect();

    let message = message_from(&channel, "a");
    channel.record_incoming(&message, &viewers);

    assert_eq!(channel.unread_for(&UserId::from("b")), 0);
    assert_eq!(channel.unread_for(&UserId::from("c")), 1);
    assert_eq!(channel.last_message, Some(message.id));
}

#[test]
fn given_unread_when_reset_then_zero() {
    let mut channel = trade_channel(&["a", "b"]);
    let message = message_from(&channel, "a");
    channel.record_incoming(&message, &HashSet::new());

    channel.reset_unread(&UserId::from("b"));

    assert_eq!(channel.unread_for(&UserId::from("b")), 0);
}

#[test]
fn given_channel_when_serialized_then_uses_camel_case_and_type_field() {
    let channel = trade_channel(&["a"]);

    let value = serde_json::to_value(&channel).unwrap();

    assert_eq!(value["type"], "trade");
    assert_eq!(value["isActive"], true);
    assert!(value.get("leagueId").is_some());
    assert!(value.get("unreadCounts").is_some());
}

#[test]
fn given_commissioner_channel_when_league_member_reads_then_allowed_but_cannot_post() {
    let league = LeagueId::from("L1");
    let channel = Channel::new(
        ChannelId::commissioner(&league),
        league.clone(),
        "Commissioner",
        ChannelType::Commissioner,
        [UserId::from("comm")],
    );
    let member = UserId::from("member");

    assert!(channel.may_read(&member, &league));
    assert!(!channel.may_read(&member, &LeagueId::from("L2")));
    assert!(!channel.may_post(&member));
}

#[test]
fn given_trade_channel_when_outsider_reads_then_denied() {
    let channel = trade_channel(&["a", "b"]);

    assert!(!channel.may_read(&UserId::from("z"), &LeagueId::from("L1")));
}

#[test]
fn given_non_participant_when_reset_unread_then_no_counter_created() {
    let mut channel = trade_channel(&["a"]);

    channel.reset_unread(&UserId::from("reader"));

    assert!(channel.unread_counts.is_empty());
}

#[test]
fn given_unread_for_several_users_when_viewed_by_one_then_only_their_counter_remains() {
    let mut channel = trade_channel(&["a", "b", "c"]);
    let message = message_from(&channel, "a");
    channel.record_incoming(&message, &HashSet::new());

    let view = channel.view_for(&UserId::from("b"));

    assert_eq!(view.unread_counts.len(), 1);
    assert_eq!(view.unread_for(&UserId::from("b")), 1);
    assert_eq!(view.unread_for(&UserId::from("c")), 0);
    assert_eq!(view.participants, channel.participants);
    assert_eq!(channel.unread_for(&UserId::from("c")), 1);
}
