//! Liveness endpoint for hosting platforms that expect an open HTTP port.

use axum::{routing::get, Router};
use tokio::net::TcpListener;

pub const ALIVE: &str = "Bot Alive";

async fn handle_alive() -> &'static str {
    ALIVE
}

/// `GET /` only; everything else falls through to axum's 404.
pub fn build_router() -> Router {
    Router::new().route("/", get(handle_alive))
}

pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(("0.0.0.0", port)).await
}

pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, build_router()).await
}
