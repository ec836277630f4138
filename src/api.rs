//! HTTP API for the agent's functions

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::config::AgentConfig;
use crate::host::{ActionExecutor, SessionStore};
use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AgentConfig>,
    pub registry: Arc<ToolRegistry>,
    pub sessions: Arc<SessionStore>,
    /// Present when actions run in-process rather than on an external host
    pub executor: Option<Arc<ActionExecutor>>,
}

impl AppState {
    pub fn new(config: AgentConfig, registry: ToolRegistry, sessions: Arc<SessionStore>) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            sessions,
            executor: None,
        }
    }

    pub fn with_executor(mut self, executor: ActionExecutor) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }
}
