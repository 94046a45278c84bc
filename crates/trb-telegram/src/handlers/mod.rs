//! Telegram update handlers.
//!
//! Converts teloxide messages into the core update model and hands them to the
//! rename service, which owns authorization, replies and side effects.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use trb_core::{
    commands::ParsedCommand,
    domain::{ChatId, MessageId, UserId},
    messaging::types::{
        Attachment, AttachmentKind, CommandMessage, FileMessage, IncomingUpdate, Sender,
    },
};

use crate::router::AppState;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(update) = to_update(&msg, state.bot_username.as_deref()) else {
        return Ok(());
    };

    // Errors have already been reported to the sender by the service.
    if let Err(e) = state.service.handle(update).await {
        tracing::debug!(chat_id = msg.chat.id.0, error = %e, "update finished with error");
    }

    Ok(())
}

/// Map a Telegram message to a core update.
///
/// Commands are accepted in any chat unless they are addressed to another bot
/// (`/cmd@other_bot`); files and everything else only in private chats.
/// Returns `None` for messages the bot ignores.
pub(crate) fn to_update(msg: &Message, own_username: Option<&str>) -> Option<IncomingUpdate> {
    let sender = Sender {
        chat_id: ChatId(msg.chat.id.0),
        user_id: msg.from().map(|u| UserId(u.id.0 as i64)),
        username: msg.from().and_then(|u| u.username.clone()),
        message_id: MessageId(msg.id.0),
    };

    if let Some(parsed) = msg.text().and_then(ParsedCommand::parse) {
        if !parsed.is_for(own_username) {
            tracing::debug!(addressed_to = ?parsed.target, "ignoring command for another bot");
            return None;
        }
        return Some(IncomingUpdate::Command(CommandMessage {
            sender,
            command: parsed.command,
        }));
    }

    if !msg.chat.is_private() {
        return None;
    }

    match attachment(msg) {
        Some(attachment) => Some(IncomingUpdate::File(FileMessage { sender, attachment })),
        None => Some(IncomingUpdate::Other(sender)),
    }
}

fn attachment(msg: &Message) -> Option<Attachment> {
    if let Some(doc) = msg.document() {
        return Some(Attachment {
            kind: AttachmentKind::Document,
            file_id: doc.file.id.clone(),
            file_name: doc.file_name.clone(),
            size: doc.file.size as u64,
        });
    }
    if let Some(video) = msg.video() {
        return Some(Attachment {
            kind: AttachmentKind::Video,
            file_id: video.file.id.clone(),
            file_name: video.file_name.clone(),
            size: video.file.size as u64,
        });
    }
    if let Some(audio) = msg.audio() {
        return Some(Attachment {
            kind: AttachmentKind::Audio,
            file_id: audio.file.id.clone(),
            file_name: audio.file_name.clone(),
            size: audio.file.size as u64,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use trb_core::commands::BotCommand;

    use super::*;

    const OWN: Option<&str> = Some("trb_bot");

    fn message(chat: serde_json::Value, extra: serde_json::Value) -> Message {
        let mut v = serde_json::json!({
            "message_id": 10,
            "date": 1700000000,
            "chat": chat,
            "from": { "id": 42, "is_bot": false, "first_name": "Ann", "username": "ann" }
        });
        if let (Some(obj), Some(extra)) = (v.as_object_mut(), extra.as_object()) {
            for (k, val) in extra {
                obj.insert(k.clone(), val.clone());
            }
        }
        serde_json::from_value(v).unwrap()
    }

    fn private_chat() -> serde_json::Value {
        serde_json::json!({ "id": 42, "type": "private", "first_name": "Ann" })
    }

    fn group_chat() -> serde_json::Value {
        serde_json::json!({ "id": -5, "type": "group", "title": "G" })
    }

    #[test]
    fn document_in_private_chat_becomes_file_update() {
        let msg = message(
            private_chat(),
            serde_json::json!({
                "document": {
                    "file_id": "abc",
                    "file_unique_id": "u-abc",
                    "file_size": 1234,
                    "file_name": "My_Show - S01E01.mkv"
                }
            }),
        );

        let Some(IncomingUpdate::File(file)) = to_update(&msg, OWN) else {
            panic!("expected file update");
        };
        assert_eq!(file.sender.user_id, Some(UserId(42)));
        assert_eq!(file.sender.chat_id, ChatId(42));
        assert_eq!(file.sender.message_id, MessageId(10));
        assert_eq!(file.attachment.kind, AttachmentKind::Document);
        assert_eq!(file.attachment.file_id, "abc");
        assert_eq!(
            file.attachment.file_name.as_deref(),
            Some("My_Show - S01E01.mkv")
        );
        assert_eq!(file.attachment.size, 1234);
    }

    #[test]
    fn commands_are_parsed_in_any_chat() {
        let msg = message(group_chat(), serde_json::json!({ "text": "/addtemplate [HD]" }));
        let Some(IncomingUpdate::Command(cmd)) = to_update(&msg, OWN) else {
            panic!("expected command update");
        };
        assert_eq!(cmd.command, BotCommand::AddTemplate("[HD]".to_string()));
    }

    #[test]
    fn group_chatter_is_ignored() {
        let msg = message(group_chat(), serde_json::json!({ "text": "hello" }));
        assert!(to_update(&msg, OWN).is_none());
    }

    #[test]
    fn private_text_is_other() {
        let msg = message(private_chat(), serde_json::json!({ "text": "hello" }));
        assert!(matches!(to_update(&msg, OWN), Some(IncomingUpdate::Other(_))));
    }

    #[test]
    fn commands_for_other_bots_are_ignored() {
        for chat in [private_chat(), group_chat()] {
            let msg = message(chat, serde_json::json!({ "text": "/start@some_other_bot" }));
            assert!(to_update(&msg, OWN).is_none());
        }

        let msg = message(group_chat(), serde_json::json!({ "text": "/help@x" }));
        assert!(to_update(&msg, None).is_none());
    }

    #[test]
    fn commands_for_this_bot_are_accepted() {
        for text in ["/start", "/start@trb_bot", "/start@TRB_Bot"] {
            let msg = message(group_chat(), serde_json::json!({ "text": text }));
            let Some(IncomingUpdate::Command(cmd)) = to_update(&msg, OWN) else {
                panic!("expected command update for {text}");
            };
            assert_eq!(cmd.command, BotCommand::Start);
        }

        let msg = message(private_chat(), serde_json::json!({ "text": "/start" }));
        assert!(matches!(
            to_update(&msg, None),
            Some(IncomingUpdate::Command(_))
        ));
    }
}
