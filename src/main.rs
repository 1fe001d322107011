use std::env;
use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use gunsan_chat_backend::logging;
use gunsan_chat_backend::server;
use gunsan_chat_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_dir = env::var("LOG_DIR").ok().map(PathBuf::from);
    logging::init(log_dir.as_deref());

    let state = AppState::initialize();

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(8000);
    let bind_addr = format!("0.0.0.0:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
