use std::sync::Arc;

use trb_core::{config::Config, templates::TemplateStore};

mod health;

#[tokio::main]
async fn main() -> Result<(), trb_core::Error> {
    trb_core::logging::init("trb")?;

    let cfg = Arc::new(Config::load()?);
    let templates = TemplateStore::open(cfg.templates_file.clone(), &cfg.seed_templates)?;

    if let Some(port) = cfg.port {
        let listener = health::bind(port).await?;
        tracing::info!(port, "health check listening");
        tokio::spawn(async move {
            if let Err(e) = health::serve(listener).await {
                tracing::error!(error = %e, "health check server stopped");
            }
        });
    }

    trb_telegram::router::run_polling(cfg, templates)
        .await
        .map_err(|e| trb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
