//! Mock implementations for testing
//!
//! These mocks let the executor run without a real carrier.

use super::executor::ActionReport;
use super::traits::*;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// One carrier interaction, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierCall {
    Say { text: String },
    SendSms { to: String, from: String, body: String },
    Connect { target: String, is_final: bool },
}

/// Carrier that records every call and can be told to fail some of them
#[derive(Default)]
pub struct RecordingCarrier {
    calls: Mutex<Vec<CarrierCall>>,
    /// Recipients, targets or spoken texts that fail delivery
    failing: Mutex<HashSet<String>>,
    delay: Option<Duration>,
}

impl RecordingCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every action before completing it
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_for(&self, destination: impl Into<String>) {
        self.failing.lock().unwrap().insert(destination.into());
    }

    pub fn recorded(&self) -> Vec<CarrierCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: CarrierCall, destination: Option<&str>) -> Result<(), DeliveryError> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match destination {
            Some(d) if self.failing.lock().unwrap().contains(d) => {
                Err(DeliveryError::new(format!("{d} unreachable")))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SmsGateway for RecordingCarrier {
    async fn send_sms(
        &self,
        _call_id: &str,
        to: &str,
        from: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        self.record(
            CarrierCall::SendSms {
                to: to.to_string(),
                from: from.to_string(),
                body: body.to_string(),
            },
            Some(to),
        )
        .await
    }
}

#[async_trait]
impl CallControl for RecordingCarrier {
    async fn say(&self, _call_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.record(
            CarrierCall::Say {
                text: text.to_string(),
            },
            Some(text),
        )
        .await
    }

    async fn connect(
        &self,
        _call_id: &str,
        target: &str,
        is_final: bool,
    ) -> Result<(), DeliveryError> {
        self.record(
            CarrierCall::Connect {
                target: target.to_string(),
                is_final,
            },
            Some(target),
        )
        .await
    }
}

/// Observer that keeps every report
#[derive(Default)]
pub struct RecordingObserver {
    reports: Mutex<Vec<ActionReport>>,
}

impl RecordingObserver {
    pub fn reports(&self) -> Vec<ActionReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl ActionObserver for RecordingObserver {
    fn on_action(&self, report: &ActionReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}
