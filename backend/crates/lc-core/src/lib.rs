pub mod error;
pub mod models;

pub use error::{CoreError, Result as CoreResult};
pub use models::channel::Channel;
pub use models::channel_type::ChannelType;
pub use models::ids::{ChannelId, LeagueId, MessageId, MessageIdGenerator, SYSTEM_USER_ID, UserId};
pub use models::message::{Message, MessageDraft, SYSTEM_DISPLAY_NAME};
pub use models::message_kind::MessageKind;
pub use models::reactions::{Reaction, Reactions};
pub use models::typing_indicator::TypingIndicator;

#[cfg(test)]
mod tests;
