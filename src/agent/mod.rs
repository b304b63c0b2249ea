//! Agent system: a product support agent that answers through the service,
//! calling local function tools when the run asks for them.

pub mod runner;
pub mod session;

pub use runner::{RunPolicy, RunProcessor};
pub use session::{
    run_conversation, save_files, transcript, AgentSession, ConversationReport, TranscriptEntry,
};

use std::sync::Arc;

use crate::error::Result;
use crate::finance::future_value_tool;
use crate::tools::{HostedTool, Tool, ToolSet};

/// Name given to the agent when none is configured.
pub const DEFAULT_AGENT_NAME: &str = "New Product Support Agent";

/// Instructions given to the agent when none are configured.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a product support agent that helps users with \
product-related queries. You can use code interpreter to generate and save text and image files \
if the user asks for it, and you can also use the given functions for calculations. Use default \
parameters for functions if not specified by the user.";

/// What to create on the service: identity, behavior and model.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub name: String,
    pub instructions: String,
    pub model: String,
}

impl AgentSpec {
    /// The product support agent on `model`.
    pub fn product_support(model: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            model: model.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }
}

/// Function tools available to the product support agent.
pub fn default_functions() -> Vec<Arc<dyn Tool>> {
    vec![future_value_tool()]
}

/// The code interpreter plus every default function tool.
pub fn default_tool_set() -> Result<ToolSet> {
    let mut tools = ToolSet::new().with_hosted(HostedTool::CodeInterpreter);
    for tool in default_functions() {
        tools.add_function(tool)?;
    }
    Ok(tools)
}
