//! Bounty Relay Server
//!
//! HTTP surface of the relay:
//! - `POST /webhook` — GitHub issue-comment deliveries
//! - `GET /setup-twitter` — start the OAuth2 consent flow (operator-driven)
//! - `GET /twitter/callback` — complete the flow, store tokens
//!
//! Webhook responses are always 200-class acknowledgments (401 only on a
//! bad signature) so GitHub never re-delivers; the interactive
//! authorization endpoints return accurate statuses instead.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AuthError, RelayError};
use crate::signature;
use crate::store::CredentialStore;
use crate::twitter::TwitterClient;
use crate::webhook::{
    self, Announcer, BountyRecorder, MSG_NOT_PROCESSED, MSG_PROCESSING_ERROR, MSG_UNAUTHORIZED,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<CredentialStore>,
    pub twitter: Arc<TwitterClient>,
    pub recorder: Arc<dyn BountyRecorder>,
    pub announcer: Arc<dyn Announcer>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/webhook", post(webhook_handler))
        .route("/setup-twitter", get(setup_twitter_handler))
        .route("/twitter/callback", get(twitter_callback_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Bounty relay is running"
}

/// POST /webhook - verify the delivery, then hand off to the processor.
async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<MessageResponse>) {
    let signature_header = headers
        .get("x-hub-signature-256")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if let Err(e) =
        signature::require_valid(&state.config.webhook_secret, signature_header, &body)
    {
        // Malformed and forged signatures get the same answer
        warn!("{e}");
        return (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new(MSG_UNAUTHORIZED)),
        );
    }

    let result = webhook::process_event(
        &body,
        &state.config.admin_usernames,
        state.recorder.as_ref(),
        state.announcer.as_ref(),
        &state.store,
    )
    .await;

    match result {
        Ok(message) => (StatusCode::OK, Json(MessageResponse::new(message))),
        Err(RelayError::Payload(detail)) => {
            warn!("ignoring malformed webhook payload: {detail}");
            (StatusCode::OK, Json(MessageResponse::new(MSG_NOT_PROCESSED)))
        }
        Err(e) => {
            // Acknowledge anyway; GitHub redelivery is not our retry queue
            error!("webhook processing failed: {e}");
            (
                StatusCode::OK,
                Json(MessageResponse::new(MSG_PROCESSING_ERROR)),
            )
        }
    }
}

/// GET /setup-twitter - generate the consent URL and redirect the operator.
///
/// At most one authorization attempt is live at a time: hitting this
/// endpoint again overwrites (and so invalidates) a pending attempt.
async fn setup_twitter_handler(State(state): State<Arc<AppState>>) -> Redirect {
    let link = state.twitter.authorization_link();
    state
        .store
        .set_auth_attempt(link.code_verifier, link.state)
        .await;
    info!("starting twitter authorization");
    Redirect::temporary(&link.url)
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// GET /twitter/callback - validate CSRF state, exchange the code, store
/// the token pair.
async fn twitter_callback_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> (StatusCode, Json<MessageResponse>) {
    // Hold the session for the whole exchange so a concurrent webhook
    // refresh cannot interleave with the initial login.
    let mut session = state.store.lock().await;

    match state
        .twitter
        .complete_authorization(&mut session, &query.code, &query.state)
        .await
    {
        Ok(_) => {
            info!("twitter authorization complete");
            (
                StatusCode::OK,
                Json(MessageResponse::new("Twitter authenticated")),
            )
        }
        Err(e @ RelayError::Auth(AuthError::InvalidState)) => {
            warn!("twitter callback rejected: {e}");
            (
                StatusCode::UNAUTHORIZED,
                Json(MessageResponse::new(MSG_UNAUTHORIZED)),
            )
        }
        Err(e) => {
            error!("twitter code exchange failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(MessageResponse::new("Twitter authentication failed")),
            )
        }
    }
}

/// Run the server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting Bounty Relay server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
