//! Compound growth calculation exposed to the agent as a function tool.
//!
//! The calculation is pure: `future_value = present_value * (1 + rate) ^ periods`,
//! evaluated with integer exponentiation so that a zero or negative base
//! still produces a well-defined real number.
//!
//! ```
//! use compound_agent::finance::calculate_future_value;
//!
//! let result = calculate_future_value(100.0, 0.03, 1)?;
//! assert_eq!(result.to_payload()?, r#"{"future_value":103.0}"#);
//! # Ok::<(), compound_agent::error::AgentError>(())
//! ```

mod payload;
pub mod tool;

pub use tool::{future_value_tool, FUTURE_VALUE_TOOL_NAME};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AgentError, Result};
use crate::tools::ToolArguments;

/// Growth applied per period when the caller does not give one (2%).
pub const DEFAULT_PERIODIC_RATE: f64 = 0.02;

/// Number of compounding periods when the caller does not give one.
pub const DEFAULT_PERIODS: u32 = 12;

/// Inputs for a single future value calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FutureValueRequest {
    pub present_value: f64,
    #[serde(default = "default_rate")]
    pub periodic_rate: f64,
    #[serde(default = "default_periods")]
    pub periods: u32,
}

fn default_rate() -> f64 {
    DEFAULT_PERIODIC_RATE
}

fn default_periods() -> u32 {
    DEFAULT_PERIODS
}

impl FutureValueRequest {
    /// Request with the default rate and period count.
    pub fn new(present_value: f64) -> Self {
        Self {
            present_value,
            periodic_rate: DEFAULT_PERIODIC_RATE,
            periods: DEFAULT_PERIODS,
        }
    }

    pub fn with_rate(mut self, periodic_rate: f64) -> Self {
        self.periodic_rate = periodic_rate;
        self
    }

    pub fn with_periods(mut self, periods: u32) -> Self {
        self.periods = periods;
        self
    }

    /// Build a request from tool call arguments.
    ///
    /// `present_value` is required; `periodic_rate` and `periods` fall back
    /// to their defaults when absent. Negative or fractional period counts
    /// are rejected rather than coerced.
    pub fn from_arguments(args: &ToolArguments) -> Result<Self> {
        let present_value = args.get_f64("present_value")?;
        let periodic_rate = args
            .get_f64_opt("periodic_rate")?
            .unwrap_or(DEFAULT_PERIODIC_RATE);
        let periods = match args.get_count_opt("periods")? {
            Some(n) => u32::try_from(n).map_err(|_| {
                AgentError::InvalidArgument(format!(
                    "periods must be at most {}, got {n}",
                    u32::MAX
                ))
            })?,
            None => DEFAULT_PERIODS,
        };
        Ok(Self {
            present_value,
            periodic_rate,
            periods,
        })
    }

    /// Run the calculation for this request.
    pub fn calculate(&self) -> Result<FutureValueResult> {
        calculate_future_value(self.present_value, self.periodic_rate, self.periods)
    }
}

/// Result of a future value calculation.
///
/// Serializes to exactly `{"future_value": <number>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FutureValueResult {
    #[serde(with = "payload::float")]
    pub future_value: f64,
}

impl FutureValueResult {
    /// Canonical text payload handed back to the tool-invocation layer.
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a payload previously produced by [`FutureValueResult::to_payload`].
    pub fn from_payload(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Compute the future value of `present_value` after `periods` periods of
/// compound growth at `periodic_rate`.
///
/// Overflow is not masked: a result of `inf` is returned as is.
pub fn calculate_future_value(
    present_value: f64,
    periodic_rate: f64,
    periods: u32,
) -> Result<FutureValueResult> {
    if !present_value.is_finite() {
        return Err(AgentError::InvalidArgument(format!(
            "present_value must be finite, got {present_value}"
        )));
    }
    if !periodic_rate.is_finite() {
        return Err(AgentError::InvalidArgument(format!(
            "periodic_rate must be finite, got {periodic_rate}"
        )));
    }

    // 0 * inf would be NaN once the growth factor overflows.
    let future_value = if present_value == 0.0 {
        0.0
    } else {
        present_value * growth_factor(periodic_rate, periods)
    };

    debug!(
        present_value,
        periodic_rate,
        periods,
        future_value,
        "future value calculated"
    );

    Ok(FutureValueResult { future_value })
}

/// `(1 + rate) ^ periods` by exponentiation by squaring.
pub fn growth_factor(periodic_rate: f64, periods: u32) -> f64 {
    let mut base = 1.0 + periodic_rate;
    let mut exp = periods;
    let mut acc = 1.0;
    while exp > 0 {
        if exp & 1 == 1 {
            acc *= base;
        }
        exp >>= 1;
        if exp > 0 {
            base *= base;
        }
    }
    acc
}

/// Value of an item at the end of one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulePoint {
    pub period: u32,
    pub value: f64,
}

/// Value after each period from `0` through `request.periods` inclusive.
pub fn value_schedule(request: &FutureValueRequest) -> Result<Vec<SchedulePoint>> {
    (0..=request.periods)
        .map(|period| {
            let result =
                calculate_future_value(request.present_value, request.periodic_rate, period)?;
            Ok(SchedulePoint {
                period,
                value: result.future_value,
            })
        })
        .collect()
}
