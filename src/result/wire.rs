//! Wire schema consumed by the host runtime

use super::{ActionRecord, GlobalStateMerge, SealedResult};
use serde::{Deserialize, Serialize};

/// Serialized function result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireResponse {
    pub reply: String,
    pub post_process: bool,
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "GlobalStateMerge::is_empty")]
    pub global_data_patch: GlobalStateMerge,
    #[serde(default)]
    pub actions: Vec<WireAction>,
}

/// One entry of the `actions` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireAction {
    Say {
        text: String,
    },
    SendSms {
        to: String,
        from: String,
        body: String,
    },
    Connect {
        target: String,
        #[serde(rename = "final")]
        is_final: bool,
    },
}

impl WireResponse {
    pub(crate) fn from_sealed(sealed: &SealedResult) -> Self {
        Self {
            reply: sealed.reply().to_string(),
            post_process: sealed.is_post_process(),
            is_final: sealed.is_final(),
            global_data_patch: sealed.global_data().clone(),
            actions: sealed
                .actions()
                .iter()
                .filter_map(WireAction::from_record)
                .collect(),
        }
    }
}

impl WireAction {
    /// Global data updates travel in `global_data_patch`, not in `actions`
    pub fn from_record(record: &ActionRecord) -> Option<Self> {
        match record {
            ActionRecord::Speak { text } => Some(WireAction::Say { text: text.clone() }),
            ActionRecord::SendSms {
                to_number,
                from_number,
                body,
            } => Some(WireAction::SendSms {
                to: to_number.clone(),
                from: from_number.clone(),
                body: body.clone(),
            }),
            ActionRecord::Connect { target, is_final } => Some(WireAction::Connect {
                target: target.clone(),
                is_final: *is_final,
            }),
            ActionRecord::UpdateGlobalData { .. } => None,
        }
    }
}
