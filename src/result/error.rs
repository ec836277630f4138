//! Result construction errors

use thiserror::Error;

/// Errors raised while building a function result.
///
/// Both variants are programming errors in the handler. They surface before
/// the handler returns, so a failed build never reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultError {
    #[error("Invalid {kind} payload: {reason}")]
    InvalidActionPayload { kind: &'static str, reason: String },
    #[error("Invalid chain state: {0}")]
    InvalidChainState(String),
}

impl ResultError {
    pub fn payload(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidActionPayload {
            kind,
            reason: reason.into(),
        }
    }

    pub fn chain_state(message: impl Into<String>) -> Self {
        Self::InvalidChainState(message.into())
    }

    pub fn is_payload(&self) -> bool {
        matches!(self, Self::InvalidActionPayload { .. })
    }

    pub fn is_chain_state(&self) -> bool {
        matches!(self, Self::InvalidChainState(_))
    }
}
