//! The managed agent service: trait seam, wire types and HTTP client.
//!
//! Agents, threads, runs and hosted tools live in the service. This module
//! only consumes its REST contract.

pub mod http;
pub mod types;

pub use http::AgentsClient;
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// Operations the conversation flow needs from the agent service.
#[async_trait]
pub trait AgentsService: Send + Sync {
    async fn create_agent(&self, definition: &AgentDefinition) -> Result<Agent>;

    async fn delete_agent(&self, agent_id: &str) -> Result<()>;

    async fn create_thread(&self) -> Result<Thread>;

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage>;

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run>;

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run>;

    /// All messages of a thread, oldest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;

    /// Raw bytes of a stored file.
    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>>;
}
