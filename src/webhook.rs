//! Bounty event processing
//!
//! Orchestrates one verified `issue_comment` delivery end to end:
//! admin + trigger check, amount extraction, Notion record, token refresh,
//! tweet. Every expected failure resolves to a benign acknowledgment
//! message so GitHub never re-delivers; only the HTTP handler decides
//! status codes.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::bounty;
use crate::error::RelayError;
use crate::store::{CredentialSession, CredentialStore};

pub const MSG_RECEIVED: &str = "Webhook received";
pub const MSG_NOT_BOUNTY: &str = "Not a bounty comment";
pub const MSG_TWEET_ERROR: &str = "Error in tweeting";
pub const MSG_NOT_PROCESSED: &str = "Not processed";
pub const MSG_PROCESSING_ERROR: &str = "Error processing webhook";
pub const MSG_UNAUTHORIZED: &str = "Unauthorized";

/// The slice of an `issue_comment` event this service consumes. Transient:
/// never retained beyond the request that carried it.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub sender: Account,
    pub comment: Comment,
    pub issue: Issue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub user: Account,
    #[serde(default)]
    pub number: Option<u64>,
}

/// Record-keeping collaborator (Notion in production).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BountyRecorder: Send + Sync {
    async fn record_bounty(&self, username: &str, amount: f64) -> Result<(), RelayError>;
}

/// Posting collaborator (Twitter in production). `ensure_access_token`
/// mutates the session the caller has locked, so the refresh and the
/// subsequent publish share one critical section.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn ensure_access_token(
        &self,
        session: &mut CredentialSession,
    ) -> Result<String, RelayError>;

    async fn publish(&self, access_token: &str, text: &str) -> Result<(), RelayError>;
}

/// Process one signature-verified webhook body.
///
/// Returns the acknowledgment message for expected outcomes. `Err` means
/// the sequence aborted (bad payload, refresh failure, record-keeping
/// failure); the handler logs it and still acknowledges with a 200-class
/// response.
pub async fn process_event(
    body: &[u8],
    admin_usernames: &[String],
    recorder: &dyn BountyRecorder,
    announcer: &dyn Announcer,
    store: &CredentialStore,
) -> Result<&'static str, RelayError> {
    let event: WebhookEvent =
        serde_json::from_slice(body).map_err(|e| RelayError::Payload(e.to_string()))?;

    let sender = &event.sender.login;
    let comment = &event.comment.body;
    let author = &event.issue.user.login;

    // Exact, case-sensitive allow-list match
    let is_admin = admin_usernames.iter().any(|admin| admin == sender);
    if !bounty::is_bounty_comment(comment) || !is_admin {
        debug!("ignoring comment from {sender}: not an admin bounty comment");
        return Ok(MSG_NOT_BOUNTY);
    }

    let Some(amount) = bounty::extract_amount(comment) else {
        debug!("bounty comment from {sender} has no parsable amount");
        return Ok(MSG_NOT_BOUNTY);
    };

    recorder.record_bounty(author, amount).await?;

    let message = format!(
        "Congratulations to the user {author} for winning a bounty of ${amount}! \
         🎉🎉🎉 #bounty #winner"
    );

    // One critical section per credential: check token, refresh if empty,
    // post, persist. Releasing the guard between these steps would let a
    // concurrent delivery race a second refresh against a rotated token.
    let mut session = store.lock().await;
    let access_token = announcer.ensure_access_token(&mut session).await?;
    if let Err(e) = announcer.publish(&access_token, &message).await {
        error!("failed to post bounty announcement: {e}");
        return Ok(MSG_TWEET_ERROR);
    }
    drop(session);

    info!(
        "bounty announced: {author} won ${amount} (issue #{})",
        event.issue.number.unwrap_or(0)
    );
    Ok(MSG_RECEIVED)
}
