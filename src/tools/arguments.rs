//! Typed access to tool call arguments.

use crate::error::AgentError;

/// Wrapper around tool call arguments providing typed extraction.
///
/// The agent service sends arguments as a JSON-encoded string; they are
/// decoded once on construction via [`ToolArguments::parse`].
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => match Self::decode(&raw) {
                Ok(decoded) => decoded,
                Err(_) => serde_json::Value::String(raw),
            },
            other => other,
        };
        Self { value }
    }

    /// Parse raw argument text as sent by the service.
    pub fn parse(raw: &str) -> Result<Self, AgentError> {
        Ok(Self {
            value: Self::decode(raw)?,
        })
    }

    fn decode(raw: &str) -> Result<serde_json::Value, AgentError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(serde_json::json!({}));
        }
        serde_json::from_str(trimmed)
            .map_err(|e| AgentError::InvalidArgument(format!("Failed to parse arguments: {e}")))
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a float argument.
    pub fn get_f64(&self, key: &str) -> Result<f64, AgentError> {
        self.get_f64_opt(key)?
            .ok_or_else(|| AgentError::InvalidArgument(format!("Missing float argument: {key}")))
    }

    /// Get an optional float argument.
    ///
    /// Absent and `null` values yield `None`; a present non-numeric value is
    /// an error rather than being ignored.
    pub fn get_f64_opt(&self, key: &str) -> Result<Option<f64>, AgentError> {
        match self.value.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                AgentError::InvalidArgument(format!("Argument {key} must be a number, got {v}"))
            }),
        }
    }

    /// Get an optional non-negative count.
    ///
    /// Accepts JSON integers and floats with no fractional part (`12.0`).
    /// Negative and fractional values are rejected.
    pub fn get_count_opt(&self, key: &str) -> Result<Option<u64>, AgentError> {
        let value = match self.value.get(key) {
            None | Some(serde_json::Value::Null) => return Ok(None),
            Some(v) => v,
        };
        if let Some(n) = value.as_u64() {
            return Ok(Some(n));
        }
        if let Some(n) = value.as_i64() {
            return Err(AgentError::InvalidArgument(format!(
                "Argument {key} must not be negative, got {n}"
            )));
        }
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
            Some(f) if f < 0.0 => Err(AgentError::InvalidArgument(format!(
                "Argument {key} must not be negative, got {f}"
            ))),
            _ => Err(AgentError::InvalidArgument(format!(
                "Argument {key} must be a whole number, got {value}"
            ))),
        }
    }
}
