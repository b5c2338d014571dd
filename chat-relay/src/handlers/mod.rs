//! HTTP handlers for the chat relay.

pub mod chat;
pub mod health;

pub use chat::{chat, method_not_allowed};
pub use health::liveness;
