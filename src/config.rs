//! Configuration management
//!
//! Everything is environment-sourced and loaded once at startup:
//! - GITHUB_WEBHOOK_SECRET: shared secret for webhook signatures
//! - ADMIN_USERNAMES: comma-separated GitHub logins allowed to award bounties
//! - TWITTER_CLIENT_API_KEY / TWITTER_CLIENT_SECRET / TWITTER_CALLBACK_URL
//! - NOTION_API_KEY / NOTION_DATABASE_ID
//! - RELAY_HOST / RELAY_PORT (optional, default 0.0.0.0:8080)

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_secret: String,
    /// Exact, case-sensitive GitHub logins.
    pub admin_usernames: Vec<String>,
    pub twitter: TwitterConfig,
    pub notion: NotionConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_key: String,
    pub database_id: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load from the environment, failing fast on anything missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            webhook_secret: require("GITHUB_WEBHOOK_SECRET")?,
            admin_usernames: parse_admin_usernames(&require("ADMIN_USERNAMES")?),
            twitter: TwitterConfig {
                client_id: require("TWITTER_CLIENT_API_KEY")?,
                client_secret: require("TWITTER_CLIENT_SECRET")?,
                callback_url: require("TWITTER_CALLBACK_URL")?,
            },
            notion: NotionConfig {
                api_key: require("NOTION_API_KEY")?,
                database_id: require("NOTION_DATABASE_ID")?,
            },
            server: ServerConfig {
                host: std::env::var("RELAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("RELAY_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
        })
    }
}

fn require(name: &'static str) -> Result<String> {
    let value =
        std::env::var(name).with_context(|| format!("{name} environment variable is required"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{name} environment variable is empty");
    }
    Ok(value)
}

/// Split the comma-separated allow-list, trimming whitespace but preserving
/// case (the match against `sender.login` is case-sensitive).
pub fn parse_admin_usernames(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
