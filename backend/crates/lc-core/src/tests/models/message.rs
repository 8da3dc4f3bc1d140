use crate::{ChannelId, LeagueId, Message, MessageDraft, MessageIdGenerator, MessageKind, SYSTEM_DISPLAY_NAME};

use serde_json::json;

#[test]
fn given_system_draft_when_built_then_flagged_as_system_announcement() {
    let draft = MessageDraft::system("Trade deadline is Friday", Some(json!({ "tradeId": "t1" })));

    assert!(draft.sender_id.is_system());
    assert_eq!(draft.sender_display_name, SYSTEM_DISPLAY_NAME);
    assert_eq!(draft.kind, MessageKind::Announcement);

    let metadata = draft.metadata.unwrap();
    assert_eq!(metadata["isSystem"], true);
    assert_eq!(metadata["tradeId"], "t1");
}

#[test]
fn given_long_body_when_previewed_then_truncated_by_chars() {
    let ids = MessageIdGenerator::new();
    let body = "é".repeat(150);
    let message = Message::from_draft(
        ids.next_id(),
        ChannelId::from("league:L1"),
        LeagueId::from("L1"),
        MessageDraft::text("alice".into(), "Alice", body),
    );

    assert_eq!(message.preview(100).chars().count(), 100);
    assert!(!message.is_edited());
}

#[test]
fn given_message_when_serialized_then_optional_fields_omitted() {
    let ids = MessageIdGenerator::new();
    let message = Message::from_draft(
        ids.next_id(),
        ChannelId::from("league:L1"),
        LeagueId::from("L1"),
        MessageDraft::text("alice".into(), "Alice", "gl"),
    );

    let value = serde_json::to_value(&message).unwrap();

    assert_eq!(value["senderId"], "alice");
    assert_eq!(value["body"], "gl");
    assert_eq!(value["kind"], "text");
    assert!(value.get("editedAt").is_none());
    assert!(value.get("replyTo").is_none());
    assert_eq!(value["reactions"], json!([]));
}
