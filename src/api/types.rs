//! API request and response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Function call as posted by the host
#[derive(Debug, Deserialize)]
pub struct FunctionCallRequest {
    pub function: String,
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub argument: Value,
    /// Global data the host holds for this call, if it tracks it itself
    #[serde(default)]
    pub global_data: Option<Map<String, Value>>,
}

/// Response with the registered function signatures
#[derive(Debug, Serialize)]
pub struct FunctionListResponse {
    pub agent: String,
    pub functions: Vec<crate::tools::ToolDefinition>,
}

/// Response with a call's global data
#[derive(Debug, Serialize)]
pub struct GlobalDataResponse {
    pub call_id: String,
    pub ended: bool,
    pub global_data: Map<String, Value>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
