use crate::{BrokerError, MessageValidator};
use crate::message_validator::{MAX_EMOJI_LENGTH, MAX_ID_LENGTH};

use lc_core::MessageKind;

use serde_json::json;

#[test]
fn given_padded_body_when_validated_then_trimmed() {
    let body = MessageValidator::validate_body("  hello  ", MessageKind::Text, None, 100).unwrap();

    assert_eq!(body, "hello");
}

#[test]
fn given_whitespace_body_when_validated_then_invalid_message() {
    let result = MessageValidator::validate_body("   \n", MessageKind::Text, None, 100);

    assert!(matches!(
        result,
        Err(BrokerError::InvalidMessage { field: Some(ref f), .. }) if f == "message"
    ));
}

#[test]
fn given_empty_gif_with_metadata_when_validated_then_accepted() {
    let metadata = json!({ "url": "https://example.com/cat.gif" });

    let body = MessageValidator::validate_body("", MessageKind::Gif, Some(&metadata), 100).unwrap();

    assert!(body.is_empty());
}

#[test]
fn given_empty_gif_without_metadata_when_validated_then_rejected() {
    let result = MessageValidator::validate_body("", MessageKind::Gif, None, 100);

    assert!(result.is_err());
}

#[test]
fn given_body_at_limit_when_validated_then_accepted_and_one_over_rejected() {
    let at_limit = "é".repeat(10);
    let over = "é".repeat(11);

    assert!(MessageValidator::validate_body(&at_limit, MessageKind::Text, None, 10).is_ok());
    assert!(MessageValidator::validate_body(&over, MessageKind::Text, None, 10).is_err());
}

#[test]
fn given_bad_ids_when_validated_then_rejected() {
    assert!(MessageValidator::validate_id("", "userId").is_err());
    assert!(MessageValidator::validate_id("has space", "userId").is_err());
    assert!(MessageValidator::validate_id(&"x".repeat(MAX_ID_LENGTH + 1), "userId").is_err());
    assert!(MessageValidator::validate_id("user-42", "userId").is_ok());
}

#[test]
fn given_blank_username_when_validated_then_rejected() {
    assert!(MessageValidator::validate_username("   ").is_err());
    assert_eq!(MessageValidator::validate_username(" Alice ").unwrap(), "Alice");
}

#[test]
fn given_emoji_variants_when_validated_then_only_clean_short_values_pass() {
    assert!(MessageValidator::validate_emoji("👍").is_ok());
    assert!(MessageValidator::validate_emoji(":fire:").is_ok());
    assert!(MessageValidator::validate_emoji("").is_err());
    assert!(MessageValidator::validate_emoji(" 👍").is_err());
    assert!(MessageValidator::validate_emoji(&"a".repeat(MAX_EMOJI_LENGTH + 1)).is_err());
}
