mod channel;
mod channel_type;
mod ids;
mod message;
mod message_kind;
mod reactions;
