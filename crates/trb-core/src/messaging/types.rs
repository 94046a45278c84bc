use std::path::PathBuf;

use crate::{
    commands::BotCommand,
    domain::{ChannelTarget, ChatId, MessageId, UserId},
};

/// Incoming update model, already stripped of Telegram-specific types.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(CommandMessage),
    File(FileMessage),
    /// Anything else sent in a private chat (plain text, stickers, photos...).
    Other(Sender),
}

impl IncomingUpdate {
    pub fn sender(&self) -> &Sender {
        match self {
            Self::Command(c) => &c.sender,
            Self::File(f) => &f.sender,
            Self::Other(s) => s,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Sender {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub message_id: MessageId,
}

#[derive(Clone, Debug)]
pub struct CommandMessage {
    pub sender: Sender,
    pub command: BotCommand,
}

#[derive(Clone, Debug)]
pub struct FileMessage {
    pub sender: Sender,
    pub attachment: Attachment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentKind {
    Document,
    Video,
    Audio,
}

impl AttachmentKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub file_id: String,
    pub file_name: Option<String>,
    pub size: u64,
}

/// Where an outgoing document goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recipient {
    Chat(ChatId),
    Channel(ChannelTarget),
}

/// A local file sent under a display name.
#[derive(Clone, Debug)]
pub struct OutgoingDocument {
    pub path: PathBuf,
    pub file_name: String,
    pub caption_html: String,
    pub reply_to: Option<MessageId>,
}

/// Length limits of a messenger implementation, in characters.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
    pub max_caption_len: usize,
}
