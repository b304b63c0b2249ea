//! Wire types for the agent service REST API.

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::tools::ToolDefinition;

/// Request body for creating an agent.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct AgentDefinition {
    #[builder(into)]
    pub model: String,
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub instructions: String,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// An agent as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Author of a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Request body for posting a message to a thread.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub role: MessageRole,
    pub content: &'a str,
}

/// A message in a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ThreadMessage {
    /// Text parts of this message, in order.
    pub fn text_messages(&self) -> impl Iterator<Item = &TextContent> {
        self.content.iter().filter_map(|part| match part {
            MessageContent::Text { text } => Some(text),
            _ => None,
        })
    }

    /// The last text part, which is what a reader of the conversation sees.
    pub fn last_text(&self) -> Option<&str> {
        self.text_messages().last().map(|t| t.value.as_str())
    }

    /// Every file path annotation across the text parts.
    pub fn file_path_annotations(&self) -> Vec<FilePathAnnotation> {
        self.text_messages()
            .flat_map(|t| t.annotations.iter())
            .filter_map(|a| match a {
                TextAnnotation::FilePath { text, file_path } => Some(FilePathAnnotation {
                    text: text.clone(),
                    file_id: file_path.file_id.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// One part of a message body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    ImageFile { image_file: FileReference },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<TextAnnotation>,
}

/// Annotation attached to a span of message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextAnnotation {
    /// A file the agent generated, e.g. with the code interpreter.
    FilePath { text: String, file_path: FileReference },
    FileCitation { text: String, file_citation: FileReference },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    pub file_id: String,
}

/// A generated file referenced from message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePathAnnotation {
    /// Annotated text, usually a sandbox path such as `sandbox:/mnt/data/report.md`.
    pub text: String,
    pub file_id: String,
}

impl FilePathAnnotation {
    /// Final path component of the annotated text.
    pub fn file_name(&self) -> Option<&str> {
        let name = self
            .text
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or_default();
        match name {
            "" | "." | ".." => None,
            name => Some(name),
        }
    }
}

/// A page of messages.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub last_id: Option<String>,
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
    Incomplete,
    /// A status this client does not know. Polled like a pending run.
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run will not change status any more.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Failed | Self::Completed | Self::Expired | Self::Incomplete
        )
    }
}

/// One execution of an agent over a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    #[serde(alias = "agent_id")]
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
    #[serde(default)]
    pub last_error: Option<RunError>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Run {
    /// Function calls the run is waiting on, if any.
    pub fn required_tool_calls(&self) -> &[RequiredToolCall] {
        match &self.required_action {
            Some(RequiredAction::SubmitToolOutputs { submit_tool_outputs }) => {
                &submit_tool_outputs.tool_calls
            }
            None => &[],
        }
    }
}

/// Action the service needs from the client before a run can continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequiredAction {
    SubmitToolOutputs { submit_tool_outputs: SubmitToolOutputs },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<RequiredToolCall>,
}

/// A function call the agent made and expects an output for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredToolCall {
    pub id: String,
    pub function: RequiredFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredFunction {
    pub name: String,
    /// JSON-encoded arguments, exactly as produced by the model.
    #[serde(default)]
    pub arguments: String,
}

/// Output for one required tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitToolOutputsRequest<'a> {
    pub tool_outputs: &'a [ToolOutput],
}

/// Error recorded on a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
