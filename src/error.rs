// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account error types shared across the session and store layers.

/// Error type for all account/session operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The identity provider rejected the request. Carries the raw
    /// provider response so callers can surface provider-specific
    /// rejection reasons without this crate reshaping them.
    #[error("authentication rejected (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("not logged in")]
    NotLoggedIn,

    /// Precondition violation on a cookie write, not a network failure.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The operation is gated on a validated email address.
    #[error("account email not validated")]
    NotVerified,

    /// Remote request failed outside the calls that swallow failures.
    #[error("account API error: {0}")]
    Api(String),

    /// The remote payload did not have the expected JSON:API shape.
    #[error("malformed API response: {0}")]
    Parse(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AccountError {
    /// True for failures of the request itself (network / non-2xx), the
    /// class that `get_user`-style calls swallow to `None`.
    pub fn is_transport(&self) -> bool {
        matches!(self, AccountError::Api(_) | AccountError::Auth { .. })
    }
}

/// Result type alias for account operations
pub type Result<T> = std::result::Result<T, AccountError>;
