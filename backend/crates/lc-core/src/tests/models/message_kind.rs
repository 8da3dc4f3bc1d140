use crate::MessageKind;

use std::str::FromStr;

#[test]
fn test_message_kind_default_is_text() {
    assert_eq!(MessageKind::default(), MessageKind::Text);
}

#[test]
fn test_message_kind_round_trips_through_str() {
    for kind in [
        MessageKind::Text,
        MessageKind::Emoji,
        MessageKind::Gif,
        MessageKind::Announcement,
        MessageKind::TradeProposal,
    ] {
        assert_eq!(MessageKind::from_str(kind.as_str()).unwrap(), kind);
    }
    assert!(MessageKind::from_str("sticker").is_err());
}

#[test]
fn test_message_kind_serializes_snake_case() {
    let json = serde_json::to_string(&MessageKind::TradeProposal).unwrap();
    assert_eq!(json, "\"trade_proposal\"");
}
