use std::fmt;

use crate::{errors::Error, Result};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Destination channel for forwarded files.
///
/// Configured either as a numeric chat id (`-1001234567890`) or as a public
/// handle. Handles are always stored with their leading `@`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelTarget {
    Id(ChatId),
    Username(String),
}

impl ChannelTarget {
    pub fn parse(raw: &str) -> Result<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(Error::Config("channel target is empty".to_string()));
        }

        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self::Id(ChatId(id)));
        }

        let handle = s.strip_prefix('@').unwrap_or(s);
        let valid = !handle.is_empty()
            && handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(Error::Config(format!(
                "invalid channel target {raw:?}: expected a numeric chat id or an @handle"
            )));
        }

        Ok(Self::Username(format!("@{handle}")))
    }
}

impl fmt::Display for ChannelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id.0),
            Self::Username(name) => f.write_str(name),
        }
    }
}
