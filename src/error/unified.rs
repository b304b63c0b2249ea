//! Unified error classification and recovery.

use serde::{Deserialize, Serialize};

/// Machine-readable error code reported by the agent service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidApiKey,
    RateLimitExceeded,
    InvalidRequest,
    NotFound,
    ServerError,
    ServiceUnavailable,
    #[serde(other)]
    Unknown,
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    InvalidInput,
    Unknown,
}

/// Structured details returned by the service API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: Option<ErrorCode>,
    pub service_code: Option<String>,
    pub param: Option<String>,
    pub request_id: Option<String>,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    IncreaseTimeout,
    CheckToolImplementation,
    FixArguments,
    ContactSupport,
}
