//! Shared test helpers and a scripted in-memory agent service.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use compound_agent::error::{AgentError, Result};
use compound_agent::service::*;

pub const AGENT_ID: &str = "asst_1";
pub const THREAD_ID: &str = "thread_1";
pub const RUN_ID: &str = "run_1";

/// A run in `status` with no pending action.
pub fn run(status: RunStatus) -> Run {
    Run {
        id: RUN_ID.to_string(),
        thread_id: THREAD_ID.to_string(),
        assistant_id: AGENT_ID.to_string(),
        status,
        required_action: None,
        last_error: None,
        created_at: None,
    }
}

/// A run waiting on the given `(call_id, function_name, arguments)` calls.
pub fn run_requiring(calls: &[(&str, &str, &str)]) -> Run {
    let tool_calls = calls
        .iter()
        .map(|(id, name, arguments)| RequiredToolCall {
            id: id.to_string(),
            function: RequiredFunction {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        })
        .collect();
    Run {
        required_action: Some(RequiredAction::SubmitToolOutputs {
            submit_tool_outputs: SubmitToolOutputs { tool_calls },
        }),
        ..run(RunStatus::RequiresAction)
    }
}

/// A failed run carrying `code` and `message`.
pub fn failed_run(code: &str, message: &str) -> Run {
    Run {
        last_error: Some(RunError {
            code: code.to_string(),
            message: message.to_string(),
        }),
        ..run(RunStatus::Failed)
    }
}

/// A text message with optional `(annotation_text, file_id)` file paths.
pub fn text_message(id: &str, role: MessageRole, text: &str, files: &[(&str, &str)]) -> ThreadMessage {
    let annotations = files
        .iter()
        .map(|(text, file_id)| TextAnnotation::FilePath {
            text: text.to_string(),
            file_path: FileReference {
                file_id: file_id.to_string(),
            },
        })
        .collect();
    ThreadMessage {
        id: id.to_string(),
        thread_id: Some(THREAD_ID.to_string()),
        role,
        content: vec![MessageContent::Text {
            text: TextContent {
                value: text.to_string(),
                annotations,
            },
        }],
        run_id: None,
        created_at: None,
    }
}

/// An agent service that replays scripted runs and records every call.
pub struct MockService {
    calls: Mutex<Vec<String>>,
    runs: Mutex<VecDeque<Run>>,
    idle: Mutex<Run>,
    submissions: Mutex<Vec<Vec<ToolOutput>>>,
    definitions: Mutex<Vec<AgentDefinition>>,
    messages: Mutex<Vec<ThreadMessage>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockService {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            runs: Mutex::new(VecDeque::new()),
            idle: Mutex::new(run(RunStatus::Completed)),
            submissions: Mutex::new(Vec::new()),
            definitions: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            files: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Queue the run returned by the next create/get/submit call.
    pub fn queue_run(&self, run: Run) -> &Self {
        self.runs.lock().unwrap().push_back(run);
        self
    }

    /// Run returned once the queue is empty (completed by default).
    pub fn when_idle(&self, run: Run) -> &Self {
        *self.idle.lock().unwrap() = run;
        self
    }

    pub fn add_message(&self, message: ThreadMessage) -> &Self {
        self.messages.lock().unwrap().push(message);
        self
    }

    pub fn add_file(&self, file_id: &str, bytes: &[u8]) -> &Self {
        self.files
            .lock()
            .unwrap()
            .insert(file_id.to_string(), bytes.to_vec());
        self
    }

    /// Make every call to `operation` fail with a 400 API error.
    pub fn fail(&self, operation: &'static str) -> &Self {
        self.failing.lock().unwrap().insert(operation);
        self
    }

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, operation: &str) -> bool {
        self.calls().iter().any(|c| c == operation)
    }

    pub fn position(&self, operation: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == operation)
    }

    pub fn submissions(&self) -> Vec<Vec<ToolOutput>> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn definitions(&self) -> Vec<AgentDefinition> {
        self.definitions.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(AgentError::api(400, format!("{operation} rejected")));
        }
        Ok(())
    }

    fn next_run(&self) -> Run {
        self.runs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.idle.lock().unwrap().clone())
    }
}

#[async_trait]
impl AgentsService for MockService {
    async fn create_agent(&self, definition: &AgentDefinition) -> Result<Agent> {
        self.record("create_agent")?;
        self.definitions.lock().unwrap().push(definition.clone());
        Ok(Agent {
            id: AGENT_ID.to_string(),
            name: Some(definition.name.clone()),
            model: Some(definition.model.clone()),
            instructions: Some(definition.instructions.clone()),
            created_at: None,
        })
    }

    async fn delete_agent(&self, _agent_id: &str) -> Result<()> {
        self.record("delete_agent")
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.record("create_thread")?;
        Ok(Thread {
            id: THREAD_ID.to_string(),
            created_at: None,
        })
    }

    async fn create_message(
        &self,
        _thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage> {
        self.record("create_message")?;
        let message = text_message("msg_user", role, content, &[]);
        self.messages.lock().unwrap().insert(0, message.clone());
        Ok(message)
    }

    async fn create_run(&self, _thread_id: &str, _agent_id: &str) -> Result<Run> {
        self.record("create_run")?;
        Ok(self.next_run())
    }

    async fn get_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
        self.record("get_run")?;
        Ok(self.next_run())
    }

    async fn cancel_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
        self.record("cancel_run")?;
        Ok(run(RunStatus::Cancelling))
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        self.record("submit_tool_outputs")?;
        self.submissions.lock().unwrap().push(outputs.to_vec());
        Ok(self.next_run())
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>> {
        self.record("list_messages")?;
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>> {
        self.record("file_content")?;
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| AgentError::api(404, format!("No file {file_id}")))
    }
}
