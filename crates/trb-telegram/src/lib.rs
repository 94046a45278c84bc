//! Telegram adapter (teloxide).
//!
//! This crate implements the `trb-core` MessagingPort over the Bot API and
//! feeds incoming updates into the core rename service.

use std::path::Path;

use async_trait::async_trait;

use teloxide::{
    net::Download,
    prelude::*,
    types::{InputFile, ParseMode},
};

use tokio::{io::AsyncWriteExt, time::sleep};

pub mod handlers;
pub mod router;

use trb_core::{
    domain::{ChannelTarget, ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{MessagingCapabilities, OutgoingDocument, Recipient},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn tg_recipient(to: &Recipient) -> teloxide::types::Recipient {
        match to {
            Recipient::Chat(id) | Recipient::Channel(ChannelTarget::Id(id)) => {
                teloxide::types::Recipient::Id(Self::tg_chat(*id))
            }
            Recipient::Channel(ChannelTarget::Username(name)) => {
                teloxide::types::Recipient::ChannelUsername(name.clone())
            }
        }
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        tracing::debug!(retry_after = ?d, "telegram rate limit, retrying");
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
            max_caption_len: 1024,
        }
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(chat_id), html.to_string())
                    .parse_mode(ParseMode::Html)
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<()> {
        let file = self
            .with_retry(|| self.bot.get_file(file_id.to_string()))
            .await?;

        let mut dst = tokio::fs::File::create(dest).await?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(|e| Error::External(format!("telegram download error: {e}")))?;
        dst.flush().await?;
        Ok(())
    }

    async fn send_document(&self, to: &Recipient, doc: &OutgoingDocument) -> Result<MessageRef> {
        let recipient = Self::tg_recipient(to);
        let msg = self
            .with_retry(|| {
                let file = InputFile::file(doc.path.clone()).file_name(doc.file_name.clone());
                let mut req = self
                    .bot
                    .send_document(recipient.clone(), file)
                    .caption(doc.caption_html.clone())
                    .parse_mode(ParseMode::Html);
                if let Some(reply_to) = doc.reply_to {
                    req = req.reply_to_message_id(Self::tg_msg_id(reply_to));
                }
                req
            })
            .await?;

        Ok(MessageRef {
            chat_id: ChatId(msg.chat.id.0),
            message_id: MessageId(msg.id.0),
        })
    }
}
