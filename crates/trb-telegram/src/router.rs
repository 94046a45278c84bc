use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use trb_core::{
    commands::COMMANDS, config::Config, messaging::port::MessagingPort, service::RenameService,
    templates::TemplateStore,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    /// This bot's username, used to drop commands addressed to other bots.
    pub bot_username: Option<String>,
    pub service: Arc<RenameService>,
}

pub fn build_bot(cfg: &Config) -> anyhow::Result<Bot> {
    let bot = Bot::new(cfg.bot_token.clone());
    let Some(raw) = cfg.telegram_api_url.as_deref() else {
        return Ok(bot);
    };
    let url = reqwest::Url::parse(raw)
        .map_err(|e| anyhow::anyhow!("invalid TELEGRAM_API_URL {raw:?}: {e}"))?;
    Ok(bot.set_api_url(url))
}

/// Command menu shown by Telegram clients, generated from the command table.
pub fn menu_commands() -> Vec<teloxide::types::BotCommand> {
    COMMANDS
        .iter()
        .map(|c| teloxide::types::BotCommand::new(c.name, c.description))
        .collect()
}

pub async fn run_polling(cfg: Arc<Config>, templates: TemplateStore) -> anyhow::Result<()> {
    let bot = build_bot(&cfg)?;

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            tracing::info!(bot = %me.username(), "template remover bot started");
            Some(me.username().to_string())
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "get_me failed; commands addressed with @ will be ignored"
            );
            None
        }
    };
    let channel = cfg
        .target_channel
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string());
    tracing::info!(
        owner_id = cfg.owner_id.0,
        target_channel = %channel,
        templates = templates.list().len(),
        templates_file = %templates.path().display(),
        "configuration loaded"
    );

    if let Err(e) = bot.set_my_commands(menu_commands()).await {
        tracing::warn!(error = %e, "failed to register command menu");
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let service = Arc::new(RenameService::new(cfg, templates, messenger));
    let state = Arc::new(AppState {
        bot_username,
        service,
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
