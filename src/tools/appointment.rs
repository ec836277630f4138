//! Appointment agent tools
//!
//! Confirm and cancel send an SMS immediately. Callback and escalation
//! defer their actions until the reply has been spoken; escalation ends the
//! call with a transfer to a supervisor.

use super::{Tool, ToolArgs, ToolContext};
use crate::result::{ResultBuilder, ResultError, SealedResult};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Confirms an appointment and texts the caller
pub struct ConfirmAppointmentTool {
    sms_from: String,
}

impl ConfirmAppointmentTool {
    pub fn new(sms_from: impl Into<String>) -> Self {
        Self {
            sms_from: sms_from.into(),
        }
    }
}

#[async_trait]
impl Tool for ConfirmAppointmentTool {
    fn name(&self) -> &'static str {
        "confirm_appointment"
    }

    fn description(&self) -> String {
        "Confirm an appointment".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "date": {"type": "string", "description": "Appointment date"},
                "time": {"type": "string", "description": "Appointment time"},
                "phone": {"type": "string", "description": "Customer phone"}
            },
            "required": ["date", "time", "phone"]
        })
    }

    async fn run(&self, args: ToolArgs, _ctx: ToolContext) -> Result<SealedResult, ResultError> {
        let (date, time, phone) = (args.str("date"), args.str("time"), args.str("phone"));

        let mut result = ResultBuilder::new(format!(
            "Your appointment is confirmed for {date} at {time}. \
             I've sent a confirmation to your phone."
        ));
        result
            .add_send_sms(
                phone,
                &self.sms_from,
                format!("Appointment confirmed: {date} at {time}"),
            )?
            .merge_global_data(json!({
                "appointment_date": date,
                "appointment_time": time,
                "confirmed": true
            }))?;
        result.build()
    }
}

/// Records a callback request; nothing runs until the reply is spoken
pub struct ScheduleCallbackTool;

#[async_trait]
impl Tool for ScheduleCallbackTool {
    fn name(&self) -> &'static str {
        "schedule_callback"
    }

    fn description(&self) -> String {
        "Schedule a callback for the customer".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "phone": {"type": "string"},
                "reason": {"type": "string"}
            },
            "required": ["phone", "reason"]
        })
    }

    async fn run(&self, args: ToolArgs, _ctx: ToolContext) -> Result<SealedResult, ResultError> {
        let mut result = ResultBuilder::new(
            "I've scheduled a callback for you. \
             One of our team members will reach out soon.",
        );
        result.mark_post_process()?.merge_global_data(json!({
            "callback_phone": args.str("phone"),
            "callback_reason": args.str("reason"),
            "callback_scheduled": true
        }))?;
        result.build()
    }
}

/// Transfers the caller to a supervisor after the reply, ending the call
pub struct EscalateCallTool {
    supervisor: String,
}

impl EscalateCallTool {
    pub fn new(supervisor: impl Into<String>) -> Self {
        Self {
            supervisor: supervisor.into(),
        }
    }
}

#[async_trait]
impl Tool for EscalateCallTool {
    fn name(&self) -> &'static str {
        "escalate_call"
    }

    fn description(&self) -> String {
        "Escalate call to supervisor".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reason": {"type": "string", "description": "Escalation reason"}
            },
            "required": ["reason"]
        })
    }

    async fn run(&self, args: ToolArgs, _ctx: ToolContext) -> Result<SealedResult, ResultError> {
        let mut result = ResultBuilder::new(
            "I understand this needs supervisor attention. \
             Let me transfer you now.",
        );
        result
            .mark_post_process()?
            .merge_global_data(json!({"escalation_reason": args.str("reason")}))?
            .add_connect(&self.supervisor, true)?;
        result.build()
    }
}

/// Cancels an appointment and texts the caller
pub struct CancelAppointmentTool {
    sms_from: String,
}

impl CancelAppointmentTool {
    pub fn new(sms_from: impl Into<String>) -> Self {
        Self {
            sms_from: sms_from.into(),
        }
    }
}

#[async_trait]
impl Tool for CancelAppointmentTool {
    fn name(&self) -> &'static str {
        "cancel_appointment"
    }

    fn description(&self) -> String {
        "Cancel an appointment".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "appointment_id": {"type": "string"},
                "phone": {"type": "string"}
            },
            "required": ["appointment_id", "phone"]
        })
    }

    async fn run(&self, args: ToolArgs, _ctx: ToolContext) -> Result<SealedResult, ResultError> {
        let (appointment_id, phone) = (args.str("appointment_id"), args.str("phone"));

        let mut result = ResultBuilder::new(format!(
            "Appointment {appointment_id} has been cancelled. \
             I've sent a confirmation to your phone. \
             Would you like to reschedule?"
        ));
        result
            .add_send_sms(
                phone,
                &self.sms_from,
                format!("Appointment {appointment_id} cancelled."),
            )?
            .merge_global_data(json!({
                "cancelled_appointment": appointment_id,
                "cancellation_confirmed": true
            }))?;
        result.build()
    }
}
