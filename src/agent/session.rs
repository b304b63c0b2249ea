//! Scoped agent session: create, converse, collect, delete.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::runner::{RunPolicy, RunProcessor};
use super::AgentSpec;
use crate::error::{AgentError, Result};
use crate::service::{
    Agent, AgentDefinition, AgentsService, FilePathAnnotation, MessageRole, Run, RunError,
    RunStatus, Thread,
};
use crate::tools::ToolSet;

/// One message of the conversation as shown to a reader.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    /// Last text part of the message, if it has any text.
    pub text: Option<String>,
    pub files: Vec<FilePathAnnotation>,
}

/// A live agent plus the thread it talks on.
///
/// The agent exists on the service until [`AgentSession::close`] is called.
pub struct AgentSession<'a> {
    service: &'a dyn AgentsService,
    tools: &'a ToolSet,
    policy: RunPolicy,
    agent: Agent,
    thread: Thread,
}

impl<'a> AgentSession<'a> {
    /// Create the agent and a fresh thread.
    ///
    /// If the thread cannot be created the agent is deleted again.
    pub async fn open(
        service: &'a dyn AgentsService,
        spec: &AgentSpec,
        tools: &'a ToolSet,
        policy: RunPolicy,
    ) -> Result<AgentSession<'a>> {
        let definition = AgentDefinition::builder()
            .model(spec.model.clone())
            .name(spec.name.clone())
            .instructions(spec.instructions.clone())
            .tools(tools.definitions())
            .build();
        let agent = service.create_agent(&definition).await?;
        info!(agent_id = %agent.id, "agent created");

        let thread = match service.create_thread().await {
            Ok(thread) => thread,
            Err(e) => {
                if let Err(cleanup) = service.delete_agent(&agent.id).await {
                    warn!(agent_id = %agent.id, error = %cleanup, "failed to delete agent");
                }
                return Err(e);
            }
        };
        info!(thread_id = %thread.id, "thread created");

        Ok(Self {
            service,
            tools,
            policy,
            agent,
            thread,
        })
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Post `prompt` as a user message and run the agent on it.
    pub async fn ask(&self, prompt: &str) -> Result<Run> {
        let message = self
            .service
            .create_message(&self.thread.id, MessageRole::User, prompt)
            .await?;
        info!(message_id = %message.id, "message created");

        RunProcessor::new(self.service, self.tools.functions(), self.policy.clone())
            .create_and_process(&self.thread.id, &self.agent.id)
            .await
    }

    /// The thread's messages, oldest first.
    pub async fn transcript(&self) -> Result<Vec<TranscriptEntry>> {
        transcript(self.service, &self.thread.id).await
    }

    /// Delete the agent. The thread and its messages remain readable.
    pub async fn close(self) -> Result<()> {
        self.service.delete_agent(&self.agent.id).await?;
        info!(agent_id = %self.agent.id, "agent deleted");
        Ok(())
    }
}

/// Read a thread's messages as transcript entries, oldest first.
pub async fn transcript(
    service: &dyn AgentsService,
    thread_id: &str,
) -> Result<Vec<TranscriptEntry>> {
    let messages = service.list_messages(thread_id).await?;
    Ok(messages
        .iter()
        .map(|msg| TranscriptEntry {
            role: msg.role,
            text: msg.last_text().map(str::to_string),
            files: msg.file_path_annotations(),
        })
        .collect())
}

/// Download every annotated file in `entries` into `dir`.
///
/// Each file is stored under the last path component of its annotation
/// text. Returns the written paths in transcript order.
pub async fn save_files(
    service: &dyn AgentsService,
    entries: &[TranscriptEntry],
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut saved = Vec::new();
    for file in entries.iter().flat_map(|e| e.files.iter()) {
        let name = file.file_name().ok_or_else(|| {
            AgentError::InvalidArgument(format!(
                "annotation '{}' does not name a file",
                file.text
            ))
        })?;
        let bytes = service.file_content(&file.file_id).await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(name);
        tokio::fs::write(&path, &bytes).await?;
        info!(file_id = %file.file_id, path = %path.display(), "file saved");
        saved.push(path);
    }
    Ok(saved)
}

/// Outcome of one full conversation.
#[derive(Debug, Clone)]
pub struct ConversationReport {
    pub agent_id: String,
    pub thread_id: String,
    pub run_id: String,
    pub status: RunStatus,
    pub last_error: Option<RunError>,
    pub transcript: Vec<TranscriptEntry>,
    pub saved_files: Vec<PathBuf>,
}

impl ConversationReport {
    pub fn failed(&self) -> bool {
        self.status == RunStatus::Failed
    }
}

/// Run the whole flow: open a session, ask, delete the agent, then collect
/// the transcript and save generated files into `output_dir`.
///
/// The agent is deleted whether or not the run succeeds. A run that ends
/// `failed` is reported through [`ConversationReport::last_error`], not as
/// an error.
pub async fn run_conversation(
    service: &dyn AgentsService,
    spec: &AgentSpec,
    tools: &ToolSet,
    policy: RunPolicy,
    prompt: &str,
    output_dir: &Path,
) -> Result<ConversationReport> {
    let session = AgentSession::open(service, spec, tools, policy).await?;
    let agent_id = session.agent().id.clone();
    let thread_id = session.thread().id.clone();

    let asked = session.ask(prompt).await;
    let closed = session.close().await;
    let run = asked?;
    closed?;

    let transcript = transcript(service, &thread_id).await?;
    let saved_files = save_files(service, &transcript, output_dir).await?;

    Ok(ConversationReport {
        agent_id,
        thread_id,
        run_id: run.id,
        status: run.status,
        last_error: run.last_error,
        transcript,
        saved_files,
    })
}
