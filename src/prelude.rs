//! Convenience re-exports for common use.

pub use crate::agent::{run_conversation, AgentSession, AgentSpec, ConversationReport, RunPolicy};
pub use crate::config::{AgentConfig, AuthValue};
pub use crate::error::{AgentError, Result};
pub use crate::finance::{calculate_future_value, FutureValueRequest, FutureValueResult};
pub use crate::service::{AgentsClient, AgentsService, RunStatus};
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments, ToolRegistry, ToolSet};
