//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::{FunctionDefinition, HostedTool, ToolDefinition, ToolRegistry, ToolSet};
pub use tool::{AgentTool, Tool, ToolExecutionContext};
pub use types::AgentToolParameters;
