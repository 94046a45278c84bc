use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{MessagingCapabilities, OutgoingDocument, Recipient},
    Result,
};

/// Messenger port.
///
/// Telegram is the only implementation; the request pipeline talks to this
/// trait so it can run against an in-memory messenger in tests.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    /// Download an attachment's bytes to `dest`, creating or truncating it.
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<()>;

    async fn send_document(&self, to: &Recipient, doc: &OutgoingDocument) -> Result<MessageRef>;
}
