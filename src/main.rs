use std::sync::Arc;

use anyhow::Context;

mod app;
mod config;
mod error;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState, users::repo::SqliteUserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "identity_api=debug,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env().context("load configuration")?;

    // The service cannot run without its table.
    let store = SqliteUserStore::connect(&config.db, config.password_scheme)
        .await
        .context("open user store")?;

    let app = app::build_app(AppState::from_parts(Arc::new(store.clone())));
    let served = app::serve(app, &config).await;

    store.close().await;
    tracing::info!("user store closed");
    served
}
