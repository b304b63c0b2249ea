//! Name-keyed tool registry and the tool set advertised to the agent service.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::validation::validate_arguments;
use crate::error::AgentError;

/// Function tool declaration as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Tool entry in an agent definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    /// Sandboxed interpreter hosted by the service.
    CodeInterpreter,
    /// Function executed locally and answered through tool outputs.
    Function { function: FunctionDefinition },
}

/// Tools that run inside the service rather than locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostedTool {
    CodeInterpreter,
}

impl HostedTool {
    fn definition(self) -> ToolDefinition {
        match self {
            Self::CodeInterpreter => ToolDefinition::CodeInterpreter,
        }
    }
}

/// Registry mapping stable tool names to their implementations.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name.
    ///
    /// Names must be unique; registering the same name twice is an error.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), AgentError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(AgentError::InvalidState(format!(
                "tool '{name}' is already registered"
            )));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations for every registered function tool, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition::Function {
                function: FunctionDefinition {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.parameters().schema.clone(),
                },
            })
            .collect()
    }

    /// Look up `name`, decode and validate `raw_arguments`, then execute.
    pub async fn invoke(
        &self,
        name: &str,
        raw_arguments: &str,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, AgentError> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;
        let args = ToolArguments::parse(raw_arguments)?;
        validate_arguments(args.raw(), &tool.parameters().schema).map_err(|message| {
            AgentError::InvalidArgument(format!("{name}: {message}"))
        })?;

        debug!(tool = name, call_id = ?ctx.call_id, "invoking tool");
        tool.execute(&args, ctx).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

/// Hosted tools plus locally executed function tools for one agent.
#[derive(Debug, Default, Clone)]
pub struct ToolSet {
    hosted: Vec<HostedTool>,
    functions: ToolRegistry,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hosted(mut self, tool: HostedTool) -> Self {
        if !self.hosted.contains(&tool) {
            self.hosted.push(tool);
        }
        self
    }

    pub fn add_function(&mut self, tool: Arc<dyn Tool>) -> Result<(), AgentError> {
        self.functions.register(tool)
    }

    pub fn functions(&self) -> &ToolRegistry {
        &self.functions
    }

    /// Full tool list for an agent definition: hosted tools first.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.hosted
            .iter()
            .map(|tool| tool.definition())
            .chain(self.functions.definitions())
            .collect()
    }
}
