//! Bounty Relay Server
//!
//! Relays GitHub bounty comments to Notion and X/Twitter

use std::sync::Arc;

use bounty_relay::server::AppState;
use bounty_relay::{Config, CredentialStore, NotionClient, TwitterClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Bounty Relay");

    let config = Config::from_env()?;
    info!(
        "Loaded configuration: {} admin(s) on the allow-list",
        config.admin_usernames.len()
    );

    // The single shared OAuth2 session, empty until /setup-twitter runs
    let store = Arc::new(CredentialStore::new());

    let twitter = Arc::new(TwitterClient::new(
        config.twitter.client_id.clone(),
        config.twitter.client_secret.clone(),
        config.twitter.callback_url.clone(),
    ));
    let notion = Arc::new(NotionClient::new(
        config.notion.api_key.clone(),
        config.notion.database_id.clone(),
    ));

    let host = config.server.host.clone();
    let port = config.server.port;

    let state = Arc::new(AppState {
        config,
        store,
        twitter: twitter.clone(),
        recorder: notion,
        announcer: twitter,
    });

    bounty_relay::server::run_server(&host, port, state).await
}
