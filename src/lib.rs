//! Bounty Relay - Announce GitHub issue bounties on X/Twitter
//!
//! Receives GitHub `issue_comment` webhooks and, when a configured admin
//! posts a `/bounty $<amount>` comment, records the bounty in Notion and
//! tweets a congratulation to the issue author.
//!
//! # How it works
//!
//! 1. GitHub delivers signed `issue_comment` events to `POST /webhook`
//! 2. The HMAC-SHA256 signature is verified against the shared secret
//! 3. An admin comment like `/bounty $50` awards the issue author a bounty
//! 4. The bounty is recorded as a page in a Notion database
//! 5. A congratulation tweet goes out through a single process-wide,
//!    self-refreshing OAuth2 session
//! 6. An operator bootstraps that session once via `GET /setup-twitter`
//!
//! # Credential model
//!
//! Exactly one OAuth2 session exists per process, held in
//! [`store::CredentialStore`] behind an async mutex. Refresh tokens rotate,
//! so "check token, refresh, tweet, persist" runs as one critical section
//! per webhook delivery. Nothing is persisted across restarts.

pub mod bounty;
pub mod config;
pub mod error;
pub mod notion;
pub mod server;
pub mod signature;
pub mod store;
pub mod twitter;
pub mod webhook;

pub use config::Config;
pub use error::{AuthError, RelayError};
pub use notion::NotionClient;
pub use store::{CredentialSession, CredentialStore};
pub use twitter::TwitterClient;
