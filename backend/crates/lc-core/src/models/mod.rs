pub mod channel;
pub mod channel_type;
pub mod ids;
pub mod message;
pub mod message_kind;
pub mod reactions;
pub mod typing_indicator;
