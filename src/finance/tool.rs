//! The `calculate_future_value` function tool.

use std::sync::Arc;

use super::{FutureValueRequest, DEFAULT_PERIODIC_RATE, DEFAULT_PERIODS};
use crate::tools::{AgentTool, AgentToolParameters, Tool};

/// Name the agent uses to call the calculation.
pub const FUTURE_VALUE_TOOL_NAME: &str = "calculate_future_value";

/// Parameter schema for [`future_value_tool`].
pub fn future_value_parameters() -> AgentToolParameters {
    AgentToolParameters::object()
        .number("present_value", "Current price or value of the item.", true)
        .number(
            "periodic_rate",
            "Growth rate applied once per period, as a fraction (0.02 is 2%). Defaults to 0.02.",
            false,
        )
        .default_value("periodic_rate", DEFAULT_PERIODIC_RATE)
        .integer(
            "periods",
            "Number of periods (months) to compound over. Defaults to 12.",
            false,
        )
        .default_value("periods", DEFAULT_PERIODS)
        .build()
}

/// Tool computing the future value of an item under monthly compound growth.
///
/// Returns `{"future_value": <number>}`.
pub fn future_value_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::from_fn(
        FUTURE_VALUE_TOOL_NAME,
        "Calculates the future value of an item after N months given its current value \
         and a monthly interest rate.",
        future_value_parameters(),
        |args| FutureValueRequest::from_arguments(args)?.calculate()?.to_value(),
    ))
}
