use crate::ChannelType;

use std::str::FromStr;

#[test]
fn test_channel_type_as_str() {
    assert_eq!(ChannelType::League.as_str(), "league");
    assert_eq!(ChannelType::Commissioner.as_str(), "commissioner");
    assert_eq!(ChannelType::Trade.as_str(), "trade");
    assert_eq!(ChannelType::Team.as_str(), "team");
}

#[test]
fn test_channel_type_from_str() {
    assert_eq!(ChannelType::from_str("trade").unwrap(), ChannelType::Trade);
    assert_eq!(ChannelType::from_str("team").unwrap(), ChannelType::Team);
    assert!(ChannelType::from_str("direct").is_err());
}

#[test]
fn test_channel_type_long_lived() {
    assert!(ChannelType::League.is_long_lived());
    assert!(ChannelType::Commissioner.is_long_lived());
    assert!(!ChannelType::Trade.is_long_lived());
    assert!(!ChannelType::Team.is_long_lived());
}
