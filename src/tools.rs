//! Tool registration and invocation
//!
//! Tools are stateless singletons. All per-call context arrives through
//! [`ToolContext`], and arguments are validated before a tool runs.

mod appointment;
mod args;

pub use appointment::{
    CancelAppointmentTool, ConfirmAppointmentTool, EscalateCallTool, ScheduleCallbackTool,
};
pub use args::{ArgumentError, ToolArgs};

use crate::config::AgentConfig;
use crate::result::{ResultError, SealedResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Everything a tool invocation may need besides its arguments
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Call session this invocation belongs to
    pub call_id: String,

    /// Snapshot of the session's global data when the call arrived
    pub global_data: Map<String, Value>,

    /// Raw request as received from the host
    pub raw_data: Option<Value>,
}

impl ToolContext {
    pub fn new(call_id: impl Into<String>, global_data: Map<String, Value>) -> Self {
        Self {
            call_id: call_id.into(),
            global_data,
            raw_data: None,
        }
    }

    pub fn with_raw_data(mut self, raw: Value) -> Self {
        self.raw_data = Some(raw);
        self
    }
}

/// A function the voice agent may call mid-conversation
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name
    fn name(&self) -> &str;

    /// Description for the agent
    fn description(&self) -> String;

    /// JSON schema for the arguments
    fn parameters(&self) -> Value;

    /// Build the result for a validated call
    async fn run(&self, args: ToolArgs, ctx: ToolContext) -> Result<SealedResult, ResultError>;
}

/// Function signature advertised to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "function")]
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Why an invocation produced no result
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error(transparent)]
    Arguments(#[from] ArgumentError),
    #[error(transparent)]
    Result(#[from] ResultError),
}

/// Collection of tools exposed by an agent
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The appointment agent's tool set
    pub fn appointment(config: &AgentConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ConfirmAppointmentTool::new(&config.sms_from)));
        registry.register(Arc::new(ScheduleCallbackTool));
        registry.register(Arc::new(EscalateCallTool::new(&config.supervisor_number)));
        registry.register(Arc::new(CancelAppointmentTool::new(&config.sms_from)));
        registry
    }

    /// Add a tool, replacing any tool registered under the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Get all function definitions for the host
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description(),
                parameters: t.parameters(),
            })
            .collect()
    }

    /// Validate arguments and run a tool by name
    pub async fn invoke(
        &self,
        name: &str,
        raw_args: Value,
        ctx: ToolContext,
    ) -> Result<SealedResult, InvokeError> {
        let tool = self
            .get(name)
            .ok_or_else(|| InvokeError::UnknownFunction(name.to_string()))?;
        let args = ToolArgs::validate(&tool.parameters(), raw_args)?;
        let call_id = ctx.call_id.clone();

        match tool.run(args, ctx).await {
            Ok(result) => {
                tracing::info!(
                    call_id = %call_id,
                    function = %name,
                    actions = result.actions().len(),
                    post_process = result.is_post_process(),
                    is_final = result.is_final(),
                    "Function executed"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(call_id = %call_id, function = %name, error = %e, "Function failed to build result");
                Err(e.into())
            }
        }
    }
}
