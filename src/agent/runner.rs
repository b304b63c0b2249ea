//! Drive a service-side run to completion, answering function calls locally.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::service::{AgentsService, RequiredToolCall, Run, RunStatus, ToolOutput};
use crate::tools::{ToolExecutionContext, ToolRegistry};
use crate::util::timeout::with_timeout;

/// How a run is polled and whether function calls are answered automatically.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub auto_function_calls: bool,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_wait: Duration::from_secs(300),
            auto_function_calls: true,
        }
    }
}

impl From<&AgentConfig> for RunPolicy {
    fn from(config: &AgentConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            max_wait: config.max_wait,
            auto_function_calls: config.auto_function_calls,
        }
    }
}

/// Creates runs and polls them until they stop.
pub struct RunProcessor<'a> {
    service: &'a dyn AgentsService,
    tools: &'a ToolRegistry,
    policy: RunPolicy,
}

impl<'a> RunProcessor<'a> {
    pub fn new(service: &'a dyn AgentsService, tools: &'a ToolRegistry, policy: RunPolicy) -> Self {
        Self {
            service,
            tools,
            policy,
        }
    }

    /// Start a run of `agent_id` on `thread_id` and wait for it to stop.
    ///
    /// Returns the run in a terminal status, or in `requires_action` when
    /// automatic function calls are disabled. Exceeding `max_wait` cancels
    /// the run and yields [`AgentError::Timeout`].
    pub async fn create_and_process(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        let run = self.service.create_run(thread_id, agent_id).await?;
        info!(run_id = %run.id, thread_id, "run created");

        let run_id = run.id.clone();
        match with_timeout(self.policy.max_wait, self.process(run)).await {
            Err(AgentError::Timeout(ms)) => {
                warn!(run_id = %run_id, "run exceeded max wait, cancelling");
                if let Err(e) = self.service.cancel_run(thread_id, &run_id).await {
                    warn!(run_id = %run_id, error = %e, "failed to cancel run");
                }
                Err(AgentError::Timeout(ms))
            }
            other => other,
        }
    }

    async fn process(&self, mut run: Run) -> Result<Run> {
        let thread_id = run.thread_id.clone();
        let run_id = run.id.clone();
        loop {
            match run.status {
                status if status.is_terminal() => {
                    info!(run_id = %run_id, %status, "run finished");
                    if status == RunStatus::Failed {
                        if let Some(err) = &run.last_error {
                            warn!(run_id = %run_id, error = %err, "run failed");
                        }
                    }
                    return Ok(run);
                }
                RunStatus::RequiresAction if !self.policy.auto_function_calls => {
                    info!(run_id = %run_id, "run requires action; automatic function calls are off");
                    return Ok(run);
                }
                RunStatus::RequiresAction => {
                    if run.required_tool_calls().is_empty() {
                        return Err(AgentError::InvalidState(format!(
                            "run {run_id} requires action but lists no tool calls"
                        )));
                    }
                    let outputs = self.dispatch(&thread_id, run.required_tool_calls()).await;
                    run = self
                        .service
                        .submit_tool_outputs(&thread_id, &run_id, &outputs)
                        .await?;
                    continue;
                }
                status => debug!(run_id = %run_id, %status, "run pending"),
            }

            tokio::time::sleep(self.policy.poll_interval).await;
            run = self.service.get_run(&thread_id, &run_id).await?;
        }
    }

    /// Execute every required call concurrently, in request order.
    async fn dispatch(&self, thread_id: &str, calls: &[RequiredToolCall]) -> Vec<ToolOutput> {
        join_all(calls.iter().map(|call| self.answer(thread_id, call))).await
    }

    async fn answer(&self, thread_id: &str, call: &RequiredToolCall) -> ToolOutput {
        let ctx = ToolExecutionContext {
            call_id: Some(call.id.clone()),
            thread_id: Some(thread_id.to_string()),
        };
        let result = self
            .tools
            .invoke(&call.function.name, &call.function.arguments, &ctx)
            .await;
        let output = match result {
            Ok(value) => value.to_string(),
            Err(e) => {
                warn!(tool = %call.function.name, call_id = %call.id, error = %e, "tool call failed");
                serde_json::json!({ "error": e.to_string() }).to_string()
            }
        };
        ToolOutput {
            tool_call_id: call.id.clone(),
            output,
        }
    }
}
