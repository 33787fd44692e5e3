//! Error types for the session core.
//!
//! Remote failures are never fatal: every gateway error is recovered locally
//! by falling back to a defined safe state (empty roster, credential-derived
//! user, or a local-fallback child).

use crate::types::SessionState;

/// Failures crossing the Remote Data Gateway boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Network-level failure; no response was obtained.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response arrived but could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// All gateway failures are transient from the orchestrator's point of
    /// view: each has a defined local fallback and none is surfaced as a
    /// hard failure.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

/// Durable credential storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential storage: {0}")]
    Backend(String),
}

/// Rejected session mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal session transition: {from:?} -> {to:?}")]
pub struct IllegalTransition {
    pub from: SessionState,
    pub to: SessionState,
}

/// Umbrella error for session commands that touch both the state machine
/// and durable storage.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("state machine: {0}")]
    State(#[from] IllegalTransition),

    #[error("credential store: {0}")]
    Store(#[from] StoreError),
}
