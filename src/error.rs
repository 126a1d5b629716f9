//! Error taxonomy for the relay
//!
//! Webhook-sourced errors are always converted to 200-class acknowledgments
//! at the handler boundary so GitHub never re-delivers. Authorization-flow
//! errors surface with accurate HTTP statuses because an operator drives
//! that flow interactively.

use thiserror::Error;

/// Failures in the OAuth2 authorization and refresh flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Callback `state` did not match the pending authorization attempt.
    #[error("callback state does not match the pending authorization attempt")]
    InvalidState,

    /// The provider rejected the authorization code, or returned no refresh
    /// token (a refresh token is mandatory for unattended operation).
    #[error("authorization code exchange failed: {0}")]
    ExchangeFailed(String),

    /// The stored refresh token was empty, expired, or rejected.
    #[error("access token refresh failed: {0}")]
    RefreshFailed(String),
}

/// Top-level error type for webhook processing and outbound calls.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed or mismatched webhook signature. Never carries detail.
    #[error("webhook signature verification failed")]
    Signature,

    /// Malformed JSON body or missing payload fields.
    #[error("malformed webhook payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A record-keeping or posting collaborator failed.
    #[error("{service} request failed: {detail}")]
    Downstream {
        service: &'static str,
        detail: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
