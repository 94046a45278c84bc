//! Request pipeline: authorization, template commands and the rename flow.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    cleaner::clean_filename,
    commands::{usage_lines, BotCommand},
    config::Config,
    domain::ChannelTarget,
    errors::Error,
    formatting::{channel_caption, escape_html, renamed_caption, templates_list, truncate_text},
    messaging::{
        port::MessagingPort,
        types::{FileMessage, IncomingUpdate, OutgoingDocument, Recipient, Sender},
    },
    security::is_authorized,
    templates::TemplateStore,
    utils::ScratchFile,
    Result,
};

const ACCESS_DENIED: &str = "❌ Access denied. You're not authorized to use this bot.";
const SEND_A_FILE: &str = "Send me a document, video or audio file and I'll clean up its name.";
const MAX_ERROR_LEN: usize = 200;

pub struct RenameService {
    cfg: Arc<Config>,
    templates: Arc<Mutex<TemplateStore>>,
    messenger: Arc<dyn MessagingPort>,
}

impl RenameService {
    pub fn new(
        cfg: Arc<Config>,
        templates: TemplateStore,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            cfg,
            templates: Arc::new(Mutex::new(templates)),
            messenger,
        }
    }

    pub fn templates(&self) -> Arc<Mutex<TemplateStore>> {
        self.templates.clone()
    }

    /// Handle one update end to end.
    ///
    /// Failures are reported to the sender before being returned, so callers
    /// only need to log them.
    pub async fn handle(&self, update: IncomingUpdate) -> Result<()> {
        let sender = update.sender().clone();
        let res = self.route(update).await;
        if let Err(e) = &res {
            self.report(&sender, e).await;
        }
        res
    }

    async fn route(&self, update: IncomingUpdate) -> Result<()> {
        let sender = update.sender();
        if !is_authorized(sender.user_id, self.cfg.owner_id) {
            tracing::warn!(
                user_id = ?sender.user_id.map(|u| u.0),
                username = sender.username.as_deref().unwrap_or("unknown"),
                "rejected unauthorized user"
            );
            return Err(Error::Unauthorized);
        }

        match update {
            IncomingUpdate::Command(cmd) => self.handle_command(&cmd.sender, cmd.command).await,
            IncomingUpdate::File(file) => self.handle_file(&file).await,
            IncomingUpdate::Other(sender) => {
                self.reply(&sender, SEND_A_FILE).await;
                Ok(())
            }
        }
    }

    async fn handle_command(&self, sender: &Sender, command: BotCommand) -> Result<()> {
        match command {
            BotCommand::Start => {
                let forward = match &self.cfg.target_channel {
                    Some(channel) => format!(
                        " and forward it to <code>{}</code>",
                        escape_html(&channel.to_string())
                    ),
                    None => String::new(),
                };
                let body = format!(
                    "👋 Hi! Send me a file and I'll remove the defined templates from its name \
and send it back to you{forward}.\n\nSend /help for commands."
                );
                self.reply(sender, &body).await;
            }

            BotCommand::Help => {
                let body = format!(
                    "📋 <b>Commands</b>\n{}\n\n{SEND_A_FILE} Templates are removed in list order, \
then runs of spaces, underscores and hyphens become a single space.",
                    escape_html(&usage_lines())
                );
                self.reply(sender, &body).await;
            }

            BotCommand::Templates => {
                let max_len = self.messenger.capabilities().max_message_len;
                let chunks = {
                    let store = self.templates.lock().await;
                    templates_list(store.list(), max_len)
                };
                for chunk in chunks {
                    self.reply(sender, &chunk).await;
                }
            }

            BotCommand::AddTemplate(template) => {
                self.templates.lock().await.add(&template).await?;
                tracing::info!(template = %template, "template added");
                self.reply(
                    sender,
                    &format!("✅ Added template <code>{}</code>.", escape_html(&template)),
                )
                .await;
            }

            BotCommand::RemoveTemplate(template) => {
                self.templates.lock().await.remove(&template).await?;
                tracing::info!(template = %template, "template removed");
                self.reply(
                    sender,
                    &format!("🗑 Removed template <code>{}</code>.", escape_html(&template)),
                )
                .await;
            }

            BotCommand::MissingArgument(spec) => {
                self.reply(
                    sender,
                    &format!("Usage: <code>{}</code>", escape_html(spec.usage)),
                )
                .await;
            }

            BotCommand::Unknown(name) => {
                self.reply(
                    sender,
                    &format!(
                        "Unknown command /{}. Send /help for usage.",
                        escape_html(&name)
                    ),
                )
                .await;
            }
        }
        Ok(())
    }

    async fn handle_file(&self, msg: &FileMessage) -> Result<()> {
        let sender = &msg.sender;
        let attachment = &msg.attachment;

        let old_name = attachment
            .file_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or(Error::MissingFilename)?;

        if attachment.size > self.cfg.max_file_size {
            return Err(Error::FileTooLarge {
                size: attachment.size,
                limit: self.cfg.max_file_size,
            });
        }

        let templates = { self.templates.lock().await.list().to_vec() };
        let new_name = clean_filename(old_name, &templates);
        if new_name.is_empty() {
            return Err(Error::EmptyFilename {
                original: old_name.to_string(),
            });
        }

        let scratch = ScratchFile::reserve(&self.cfg.temp_dir, &new_name);

        self.messenger
            .download_file(&attachment.file_id, scratch.path())
            .await
            .map_err(|e| Error::External(format!("Failed to download file: {e}")))?;

        let reply = OutgoingDocument {
            path: scratch.path().to_path_buf(),
            file_name: new_name.clone(),
            caption_html: renamed_caption(
                old_name,
                &new_name,
                self.messenger.capabilities().max_caption_len,
            ),
            reply_to: Some(sender.message_id),
        };
        self.messenger
            .send_document(&Recipient::Chat(sender.chat_id), &reply)
            .await
            .map_err(|e| Error::External(format!("Failed to send renamed file: {e}")))?;

        tracing::info!(
            kind = attachment.kind.label(),
            old_name,
            new_name = %new_name,
            "renamed file sent"
        );

        if let Some(channel) = &self.cfg.target_channel {
            if let Err(e) = self.forward(channel, &scratch, &new_name).await {
                tracing::warn!(channel = %channel, error = %e, "failed to forward file to channel");
                self.reply(
                    sender,
                    &format!(
                        "⚠️ Failed to send to channel: {}",
                        escape_html(&truncate_text(&e.to_string(), MAX_ERROR_LEN))
                    ),
                )
                .await;
            }
        }

        Ok(())
    }

    /// Best-effort copy to the configured channel.
    async fn forward(
        &self,
        channel: &ChannelTarget,
        scratch: &ScratchFile,
        new_name: &str,
    ) -> Result<()> {
        let doc = OutgoingDocument {
            path: scratch.path().to_path_buf(),
            file_name: new_name.to_string(),
            caption_html: channel_caption(
                new_name,
                self.messenger.capabilities().max_caption_len,
            ),
            reply_to: None,
        };
        self.messenger
            .send_document(&Recipient::Channel(channel.clone()), &doc)
            .await?;
        tracing::info!(channel = %channel, new_name, "file forwarded to channel");
        Ok(())
    }

    async fn report(&self, sender: &Sender, err: &Error) {
        let body = match err {
            Error::Unauthorized => ACCESS_DENIED.to_string(),
            Error::MissingFilename => "Couldn't detect filename.".to_string(),
            Error::EmptyFilename { original } => format!(
                "❌ Nothing is left of <code>{}</code> after removing templates. File not sent.",
                escape_html(original)
            ),
            Error::FileTooLarge { size, limit } => format!(
                "❌ File too large ({:.1} MB). Maximum size is {:.1} MB.",
                *size as f64 / 1_048_576.0,
                *limit as f64 / 1_048_576.0
            ),
            Error::DuplicateTemplate(t) => format!(
                "⚠️ Template <code>{}</code> already exists.",
                escape_html(t)
            ),
            Error::TemplateNotFound(t) => {
                format!("⚠️ Template <code>{}</code> not found.", escape_html(t))
            }
            Error::Io(_) | Error::Json(_) => {
                tracing::error!(error = %err, "failed to persist templates");
                format!(
                    "❌ Failed to save templates: {}",
                    escape_html(&truncate_text(&err.to_string(), MAX_ERROR_LEN))
                )
            }
            Error::External(msg) | Error::Config(msg) => {
                tracing::error!(error = %msg, "request failed");
                format!("❌ {}", escape_html(&truncate_text(msg, MAX_ERROR_LEN)))
            }
        };
        self.reply(sender, &body).await;
    }

    async fn reply(&self, sender: &Sender, html: &str) {
        if let Err(e) = self.messenger.send_html(sender.chat_id, html).await {
            tracing::warn!(chat_id = sender.chat_id.0, error = %e, "failed to send reply");
        }
    }
}
