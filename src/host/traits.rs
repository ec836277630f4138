//! Trait abstractions for carrier I/O
//!
//! These traits let the executor run against mock carriers in tests.

use super::executor::ActionReport;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A carrier rejected or failed to perform an action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DeliveryError {
    pub message: String,
}

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outbound SMS delivery
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send_sms(
        &self,
        call_id: &str,
        to: &str,
        from: &str,
        body: &str,
    ) -> Result<(), DeliveryError>;
}

/// Live call control
#[async_trait]
pub trait CallControl: Send + Sync {
    /// Speak text to the caller
    async fn say(&self, call_id: &str, text: &str) -> Result<(), DeliveryError>;

    /// Bridge the call to `target`. With `is_final` the agent leaves the call.
    async fn connect(&self, call_id: &str, target: &str, is_final: bool)
        -> Result<(), DeliveryError>;
}

/// Receives one report per executed, failed or skipped action
pub trait ActionObserver: Send + Sync {
    fn on_action(&self, report: &ActionReport);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SmsGateway + ?Sized> SmsGateway for Arc<T> {
    async fn send_sms(
        &self,
        call_id: &str,
        to: &str,
        from: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        (**self).send_sms(call_id, to, from, body).await
    }
}

#[async_trait]
impl<T: CallControl + ?Sized> CallControl for Arc<T> {
    async fn say(&self, call_id: &str, text: &str) -> Result<(), DeliveryError> {
        (**self).say(call_id, text).await
    }

    async fn connect(
        &self,
        call_id: &str,
        target: &str,
        is_final: bool,
    ) -> Result<(), DeliveryError> {
        (**self).connect(call_id, target, is_final).await
    }
}
