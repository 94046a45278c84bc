//! Messenger abstraction: what the bot needs from a chat platform.

pub mod port;
pub mod types;
