//! Action records produced by function handlers

use super::{GlobalStateMerge, ResultError};
use serde::Serialize;
use std::fmt;

/// Kind tag for an [`ActionRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Speak,
    SendSms,
    Connect,
    UpdateGlobalData,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Speak => "say",
            ActionKind::SendSms => "send_sms",
            ActionKind::Connect => "connect",
            ActionKind::UpdateGlobalData => "update_global_data",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of a single side effect. Never executed here; the host runs it.
///
/// Construct through the validating constructors so required fields are
/// always present.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRecord {
    Speak {
        text: String,
    },
    SendSms {
        to_number: String,
        from_number: String,
        body: String,
    },
    Connect {
        target: String,
        is_final: bool,
    },
    UpdateGlobalData {
        patch: GlobalStateMerge,
    },
}

impl ActionRecord {
    pub fn speak(text: impl Into<String>) -> Result<Self, ResultError> {
        let text = required(ActionKind::Speak, "text", text.into())?;
        Ok(ActionRecord::Speak { text })
    }

    pub fn send_sms(
        to_number: impl Into<String>,
        from_number: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, ResultError> {
        Ok(ActionRecord::SendSms {
            to_number: required(ActionKind::SendSms, "to_number", to_number.into())?,
            from_number: required(ActionKind::SendSms, "from_number", from_number.into())?,
            body: required(ActionKind::SendSms, "body", body.into())?,
        })
    }

    pub fn connect(target: impl Into<String>, is_final: bool) -> Result<Self, ResultError> {
        let target = required(ActionKind::Connect, "target", target.into())?;
        Ok(ActionRecord::Connect { target, is_final })
    }

    pub fn update_global_data(patch: GlobalStateMerge) -> Self {
        ActionRecord::UpdateGlobalData { patch }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRecord::Speak { .. } => ActionKind::Speak,
            ActionRecord::SendSms { .. } => ActionKind::SendSms,
            ActionRecord::Connect { .. } => ActionKind::Connect,
            ActionRecord::UpdateGlobalData { .. } => ActionKind::UpdateGlobalData,
        }
    }

    /// True for a connect that ends the call once it completes
    pub fn ends_call(&self) -> bool {
        matches!(self, ActionRecord::Connect { is_final: true, .. })
    }
}

fn required(kind: ActionKind, field: &str, value: String) -> Result<String, ResultError> {
    if value.trim().is_empty() {
        return Err(ResultError::payload(
            kind.as_str(),
            format!("{field} must not be empty"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_sms_requires_every_field() {
        assert!(ActionRecord::send_sms("+15551112222", "+15559999999", "hi").is_ok());

        let err = ActionRecord::send_sms("", "+15559999999", "hi").unwrap_err();
        assert_eq!(
            err,
            ResultError::payload("send_sms", "to_number must not be empty")
        );
        assert!(ActionRecord::send_sms("+15551112222", "  ", "hi")
            .unwrap_err()
            .is_payload());
        assert!(ActionRecord::send_sms("+15551112222", "+15559999999", "")
            .unwrap_err()
            .is_payload());
    }

    #[test]
    fn test_connect_requires_target() {
        let err = ActionRecord::connect("", true).unwrap_err();
        assert!(err.is_payload());
        assert!(err.to_string().contains("target"));
    }

    #[test]
    fn test_ends_call_only_for_final_connect() {
        assert!(ActionRecord::connect("+15551234567", true).unwrap().ends_call());
        assert!(!ActionRecord::connect("+15551234567", false).unwrap().ends_call());
        assert!(!ActionRecord::speak("hello").unwrap().ends_call());
    }

    #[test]
    fn test_kind_names_match_wire_types() {
        assert_eq!(ActionKind::SendSms.to_string(), "send_sms");
        assert_eq!(ActionKind::Connect.to_string(), "connect");
        assert_eq!(ActionKind::Speak.to_string(), "say");
    }
}
