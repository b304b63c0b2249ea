//! CLI command handlers for calc, tools and ask.

use std::fmt::Write as _;

use super::{AskArgs, CalcArgs, DEFAULT_PROMPT};
use crate::agent::{default_tool_set, run_conversation, AgentSpec, ConversationReport, RunPolicy};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::finance::{value_schedule, FutureValueRequest, SchedulePoint};
use crate::service::AgentsClient;

/// Handle `compound-agent calc`.
pub fn handle_calc(args: &CalcArgs) -> Result<()> {
    let request = FutureValueRequest::new(args.present_value)
        .with_rate(args.rate)
        .with_periods(args.periods);

    if args.schedule {
        print!("{}", format_schedule(&value_schedule(&request)?));
    } else {
        println!("{}", request.calculate()?.to_payload()?);
    }
    Ok(())
}

/// Handle `compound-agent tools`.
pub fn handle_tools() -> Result<()> {
    let definitions = default_tool_set()?.definitions();
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}

/// Handle `compound-agent ask`.
pub async fn handle_ask(args: AskArgs) -> Result<()> {
    let config = ask_config(&args)?;
    let client = AgentsClient::new(&config)?;
    let tools = default_tool_set()?;
    let prompt = args.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);

    let report = run_conversation(
        &client,
        &AgentSpec::product_support(config.model.clone()),
        &tools,
        RunPolicy::from(&config),
        prompt,
        &config.output_dir,
    )
    .await?;

    print!("{}", format_report(&report));
    Ok(())
}

/// Load config for `ask`, letting flags override file and environment.
pub fn ask_config(args: &AskArgs) -> Result<AgentConfig> {
    let config = apply_flags(AgentConfig::load(args.config.as_deref())?, args);
    config.validate()?;
    Ok(config)
}

/// Overlay the flags given to `ask` on a loaded config.
pub fn apply_flags(mut config: AgentConfig, args: &AskArgs) -> AgentConfig {
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if args.no_auto_tools {
        config.auto_function_calls = false;
    }
    config
}

/// One `period<TAB>value` line per schedule point.
pub fn format_schedule(points: &[SchedulePoint]) -> String {
    let mut out = String::from("period\tvalue\n");
    for point in points {
        let _ = writeln!(out, "{}\t{:.2}", point.period, point.value);
    }
    out
}

/// Human-readable summary of a finished conversation.
pub fn format_report(report: &ConversationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Agent: {}", report.agent_id);
    let _ = writeln!(out, "Thread: {}", report.thread_id);
    let _ = writeln!(out, "Run {} finished with status: {}", report.run_id, report.status);
    if let Some(err) = &report.last_error {
        let _ = writeln!(out, "Run failed: {err}");
    }
    for entry in &report.transcript {
        if let Some(text) = &entry.text {
            let _ = writeln!(out, "{}: {text}", entry.role);
        }
    }
    for path in &report.saved_files {
        let _ = writeln!(out, "Saved file: {}", path.display());
    }
    out
}
