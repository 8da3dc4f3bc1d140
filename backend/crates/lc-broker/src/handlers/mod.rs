pub mod channel;
pub mod connection;
pub mod context;
pub mod dispatcher;
pub mod error_boundary;
pub mod error_codes;
pub mod message;
pub mod reaction;
pub mod typing;
