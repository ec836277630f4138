//! Production carrier adapters

use super::traits::{CallControl, DeliveryError, SmsGateway};
use crate::result::WireAction;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Carrier that only logs what it would do
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunCarrier;

#[async_trait]
impl SmsGateway for DryRunCarrier {
    async fn send_sms(
        &self,
        call_id: &str,
        to: &str,
        from: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        tracing::info!(call_id = %call_id, to = %to, from = %from, body_len = body.len(), "Dry run: send_sms");
        Ok(())
    }
}

#[async_trait]
impl CallControl for DryRunCarrier {
    async fn say(&self, call_id: &str, text: &str) -> Result<(), DeliveryError> {
        tracing::info!(call_id = %call_id, text = %text, "Dry run: say");
        Ok(())
    }

    async fn connect(
        &self,
        call_id: &str,
        target: &str,
        is_final: bool,
    ) -> Result<(), DeliveryError> {
        tracing::info!(call_id = %call_id, target = %target, is_final, "Dry run: connect");
        Ok(())
    }
}

/// Body posted to the carrier webhook
#[derive(Debug, Serialize)]
struct WebhookRequest<'a> {
    call_id: &'a str,
    action: WireAction,
}

/// Carrier that forwards each action to an HTTP webhook
pub struct WebhookCarrier {
    client: reqwest::Client,
    url: String,
}

impl WebhookCarrier {
    pub fn new(url: impl Into<String>) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DeliveryError::new(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn post(&self, call_id: &str, action: WireAction) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookRequest { call_id, action })
            .send()
            .await
            .map_err(|e| DeliveryError::new(format!("Carrier request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::new(format!(
                "Carrier returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SmsGateway for WebhookCarrier {
    async fn send_sms(
        &self,
        call_id: &str,
        to: &str,
        from: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        self.post(
            call_id,
            WireAction::SendSms {
                to: to.to_string(),
                from: from.to_string(),
                body: body.to_string(),
            },
        )
        .await
    }
}

#[async_trait]
impl CallControl for WebhookCarrier {
    async fn say(&self, call_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.post(
            call_id,
            WireAction::Say {
                text: text.to_string(),
            },
        )
        .await
    }

    async fn connect(
        &self,
        call_id: &str,
        target: &str,
        is_final: bool,
    ) -> Result<(), DeliveryError> {
        self.post(
            call_id,
            WireAction::Connect {
                target: target.to_string(),
                is_final,
            },
        )
        .await
    }
}
